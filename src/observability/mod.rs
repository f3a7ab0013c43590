//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Watcher and status server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing` fields, not formatted strings
//! - Metrics are cheap (atomic increments behind the `metrics` facade)
//! - Metrics are recorded even without an exporter installed

pub mod logging;
pub mod metrics;
