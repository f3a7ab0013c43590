//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)           CLI flags
//!     → loader.rs (parse)          │
//!     → validation.rs ◀────────────┘ (overrides re-validated)
//!     → WatchConfig (validated, immutable)
//!     → handed to the watcher and the status server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, PageConfig, ProxyMode, TargetConfig, WatchConfig};
pub use validation::{validate_config, ValidationError};
