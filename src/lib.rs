//! Release tag watcher.
//!
//! Polls one URL on a fixed interval and serves a page saying whether the
//! last probe succeeded ("YES!") or not ("No.").

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod watcher;

pub use config::WatchConfig;
pub use http::{StatusPage, StatusServer};
pub use lifecycle::Shutdown;
pub use probe::{HttpProber, ProbeOutcome, Prober};
pub use watcher::{StatusReader, TagState, Watcher};
