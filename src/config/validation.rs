//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the target URL (parseable, http or https)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Validate bind addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyMode, WatchConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target url {url:?} is invalid: {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("target url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("proxy url {url:?} is invalid: {reason}")]
    InvalidProxyUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &WatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = config.target.resolved_url();
    match Url::parse(&url) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                errors.push(ValidationError::UnsupportedScheme(url));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidTargetUrl {
            url,
            reason: e.to_string(),
        }),
    }

    if let ProxyMode::Url(proxy) = &config.target.proxy {
        if let Err(e) = Url::parse(proxy) {
            errors.push(ValidationError::InvalidProxyUrl {
                url: proxy.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.target.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero { field: "target.poll_interval_ms" });
    }
    if config.target.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "target.timeout_ms" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
