//! HTTP status page subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, any method, any path)
//!     → StatusReader::snapshot (lock-free load, never probes)
//!     → page.rs (render "YES!" / "No.")
//!     → 200 OK to client
//! ```

pub mod page;
pub mod server;

pub use page::StatusPage;
pub use server::StatusServer;
