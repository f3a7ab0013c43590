//! HTTP probe.
//!
//! # Responsibilities
//! - Issue one GET against the target
//! - Bound the probe with a timeout
//! - Classify the response and record the outcome

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::redirect::Policy;
use reqwest::Proxy;
use thiserror::Error;
use tokio::time;

use crate::config::ProxyMode;
use crate::observability::metrics;
use crate::probe::{is_tagged_status, ProbeOutcome, Prober};

/// Why a probe did not report the target as tagged.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-success status {0}")]
    Status(StatusCode),
}

impl ProbeError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Transport(_) => "transport",
            ProbeError::Status(_) => "status",
        }
    }
}

/// Prober backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    /// Create a prober whose probes give up after `timeout`.
    pub fn new(timeout: Duration, proxy: &ProxyMode) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(timeout)
            .user_agent(concat!("tag-watcher/", env!("CARGO_PKG_VERSION")));

        builder = match proxy {
            // reqwest reads HTTP_PROXY / HTTPS_PROXY / NO_PROXY by default.
            ProxyMode::System => builder,
            ProxyMode::Direct => builder.no_proxy(),
            ProxyMode::Url(url) => builder.proxy(Proxy::all(url.as_str())?),
        };

        Ok(Self {
            client: builder.build()?,
            timeout,
        })
    }

    /// GET `url` once and return the status if it is in the success class.
    pub async fn check(&self, url: &str) -> Result<StatusCode, ProbeError> {
        let response = time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout(self.timeout)
                } else {
                    ProbeError::Transport(e)
                }
            })?;

        let status = response.status();
        if is_tagged_status(status) {
            Ok(status)
        } else {
            Err(ProbeError::Status(status))
        }
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        self.probe_outcome(url).await.tagged
    }

    async fn probe_outcome(&self, url: &str) -> ProbeOutcome {
        metrics::record_probe();

        match self.check(url).await {
            Ok(status) => {
                tracing::debug!(url = %url, status = %status, "Probe succeeded");
                ProbeOutcome::tagged()
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Probe failed");
                metrics::record_probe_error(e.kind());
                ProbeOutcome::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connection_refused_is_not_tagged() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = HttpProber::new(Duration::from_secs(2), &ProxyMode::Direct).unwrap();
        let url = format!("http://{}/", addr);

        assert!(matches!(prober.check(&url).await, Err(ProbeError::Transport(_))));
        assert!(!prober.probe(&url).await);

        let outcome = prober.probe_outcome(&url).await;
        assert!(!outcome.tagged);
        assert!(outcome.error.unwrap().starts_with("transport error"));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_not_tagged() {
        let prober = HttpProber::new(Duration::from_secs(2), &ProxyMode::Direct).unwrap();
        assert!(!prober.probe("http://tag-watcher.invalid/").await);
    }

    #[tokio::test]
    async fn test_hung_target_times_out() {
        // Accepts connections but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let prober = HttpProber::new(Duration::from_millis(100), &ProxyMode::Direct).unwrap();
        let started = std::time::Instant::now();
        let result = prober.check(&format!("http://{}/", addr)).await;

        assert!(matches!(result, Err(ProbeError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
        server.abort();
    }

    #[tokio::test]
    async fn test_explicit_proxy_carries_the_request() {
        // A stand-in proxy that answers every request with 200 and
        // remembers the request line it saw.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy_addr = listener.local_addr().unwrap();
        let seen = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        let proxy = ProxyMode::Url(format!("http://{}", proxy_addr));
        let prober = HttpProber::new(Duration::from_secs(2), &proxy).unwrap();

        // The target host does not resolve; only the proxy can answer.
        assert!(prober.probe("http://tag-watcher.invalid/release").await);

        let request = seen.await.unwrap();
        assert!(
            request.starts_with("GET http://tag-watcher.invalid/release HTTP/1.1"),
            "request = {:?}",
            request
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProbeError::Timeout(Duration::from_secs(1)).kind(), "timeout");
        assert_eq!(ProbeError::Status(StatusCode::NOT_FOUND).kind(), "status");
    }
}
