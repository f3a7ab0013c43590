//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A mock target whose response status can be changed while it runs.
pub struct MockTarget {
    pub addr: SocketAddr,
    status: Arc<AtomicU16>,
}

impl MockTarget {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }
}

/// Start a mock target on an ephemeral port answering with `status`.
pub async fn start_mock_target(status: u16) -> MockTarget {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status = Arc::new(AtomicU16::new(status));
    let current = status.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let code = current.load(Ordering::SeqCst);
            tokio::spawn(respond(socket, code));
        }
    });

    MockTarget { addr, status }
}

async fn respond(mut socket: TcpStream, code: u16) {
    // Read the request head before answering.
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let reason = StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let body = format!("status {}", code);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
