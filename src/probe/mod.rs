//! Target probing subsystem.
//!
//! # Data Flow
//! ```text
//! Watcher tick
//!     → Prober::probe(url)
//!     → http.rs: single GET, bounded by timeout
//!     → status code classified (2xx = tagged)
//!     → ProbeOutcome (tagged + failure reason) handed back to the watcher
//! ```
//!
//! # Design Decisions
//! - Probes are best-effort: transport errors mean "not tagged", not failure
//! - Redirects are not followed; a 3xx is not a success
//! - No retries inside a probe; the poll interval is the retry cadence

pub mod http;

use std::future::Future;

use axum::http::StatusCode;

pub use self::http::{HttpProber, ProbeError};

/// Result of one probe, with the reason when it was not tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub tagged: bool,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn tagged() -> Self {
        Self { tagged: true, error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            tagged: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<bool> for ProbeOutcome {
    fn from(tagged: bool) -> Self {
        Self { tagged, error: None }
    }
}

/// Something that can decide whether a target is currently tagged.
pub trait Prober: Send + Sync + 'static {
    /// Probe `url` once. Never fails; unreachable targets are `false`.
    fn probe(&self, url: &str) -> impl Future<Output = bool> + Send;

    /// Probe `url` once, keeping the failure reason if there is one.
    fn probe_outcome(&self, url: &str) -> impl Future<Output = ProbeOutcome> + Send {
        let tagged = self.probe(url);
        async move { ProbeOutcome::from(tagged.await) }
    }
}

/// Return true if `status` is in the success class (200-299).
pub fn is_tagged_status(status: StatusCode) -> bool {
    status.is_success()
}
