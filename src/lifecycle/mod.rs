//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → status server stops accepting and drains
//!             → watcher loop exits, no further probes
//! ```
//!
//! # Design Decisions
//! - One broadcast coordinator, subscribed to by every long-running task
//! - A dropped coordinator counts as a shutdown for its subscribers

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
