//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watcher.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder substituted with [`TargetConfig::version`].
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Root configuration for the watcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Listener configuration for the status page.
    pub listener: ListenerConfig,

    /// The watched target and its polling schedule.
    pub target: TargetConfig,

    /// Status page rendering.
    pub page: PageConfig,

    /// Timeout configuration for the serving side.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Explicit URL to probe. Takes precedence over `url_template`.
    pub url: Option<String>,

    /// Release version being waited for.
    pub version: String,

    /// URL template; `{version}` is replaced with `version`.
    pub url_template: String,

    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// How probes reach the target.
    pub proxy: ProxyMode,
}

/// Proxy selection for probes.
///
/// ```toml
/// proxy = "system"                          # HTTP_PROXY / HTTPS_PROXY / NO_PROXY
/// proxy = "direct"                          # never use a proxy
/// proxy = { url = "http://proxy:3128" }     # always this proxy
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    #[default]
    System,
    Direct,
    Url(String),
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: None,
            version: "1.4".to_string(),
            url_template: "https://go.googlesource.com/go/+/go{version}".to_string(),
            poll_interval_ms: 5_000,
            timeout_ms: 5_000,
            proxy: ProxyMode::System,
        }
    }
}

impl TargetConfig {
    /// The URL the watcher probes.
    pub fn resolved_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => self.url_template.replace(VERSION_PLACEHOLDER, &self.version),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Status page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// What the page asks about, e.g. "Is Go 1.4 out yet?".
    /// `{version}` is replaced with the target version.
    pub subject: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            subject: "Go {version}".to_string(),
        }
    }
}

impl PageConfig {
    /// Subject with the version substituted.
    pub fn resolved_subject(&self, version: &str) -> String {
        self.subject.replace(VERSION_PLACEHOLDER, version)
    }
}

/// Timeout configuration for the serving side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
