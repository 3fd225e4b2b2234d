//! Common test utilities for jrhttp-client integration tests
//!
//! This module provides a mock HTTP/1.0 server and helpers for testing
//! client behavior against real sockets without a real JSON-RPC server.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// What the mock server does once it has read a request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `200 OK` with this JSON body, then close
    Json(String),
    /// These exact bytes, envelope included, then close
    Raw(Vec<u8>),
    /// These bytes, then hold the connection open without finishing
    Partial(Vec<u8>),
    /// Hold the connection open without sending anything
    Stall,
    /// Close without sending anything
    Close,
}

/// A request as the server read it off the socket
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line and headers, without the blank line
    pub head: String,
    /// Body, exactly `Content-Length` bytes
    pub body: String,
}

impl RecordedRequest {
    /// The first line, e.g. `POST / HTTP/1.0`
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Mock HTTP server for client testing
///
/// Accepts any number of connections. Each connection carries one request;
/// the handler sees the body and decides how to answer.
pub struct MockHttpServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    request_rx: mpsc::Receiver<RecordedRequest>,
    closed_rx: mpsc::Receiver<()>,
}

impl MockHttpServer {
    /// Start a server that answers every request with `reply`
    pub async fn replying(reply: MockReply) -> Self {
        Self::with_handler(move |_| reply.clone()).await
    }

    /// Start a mock server with a custom handler
    pub async fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&str) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = Arc::new(handler);

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (request_tx, request_rx) = mpsc::channel::<RecordedRequest>(100);
        let (closed_tx, closed_rx) = mpsc::channel::<()>(100);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    accept_result = listener.accept() => {
                        if let Ok((stream, _)) = accept_result {
                            let handler = handler.clone();
                            let request_tx = request_tx.clone();
                            let closed_tx = closed_tx.clone();
                            tokio::spawn(async move {
                                serve(stream, handler.as_ref(), request_tx, closed_tx).await;
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            request_rx,
            closed_rx,
        }
    }

    /// Base URL of this server, e.g. `http://127.0.0.1:4321/`
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Base URL with a path and embedded credentials
    pub fn url_with(&self, userinfo: &str, path: &str) -> String {
        format!("http://{}@{}{}", userinfo, self.addr, path)
    }

    /// Get the bound socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the next request the server reads
    ///
    /// Returns None if the timeout expires.
    pub async fn wait_for_message(&mut self) -> Option<RecordedRequest> {
        tokio::time::timeout(Duration::from_secs(5), self.request_rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// The next request if one has already been read
    pub fn try_message(&mut self) -> Option<RecordedRequest> {
        self.request_rx.try_recv().ok()
    }

    /// Wait until the client closes a stalled connection
    pub async fn wait_for_close(&mut self) -> bool {
        tokio::time::timeout(Duration::from_secs(5), self.closed_rx.recv())
            .await
            .ok()
            .flatten()
            .is_some()
    }

    /// Shutdown the mock server
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn serve(
    mut stream: TcpStream,
    handler: &(dyn Fn(&str) -> MockReply + Send + Sync),
    request_tx: mpsc::Sender<RecordedRequest>,
    closed_tx: mpsc::Sender<()>,
) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    let reply = handler(&request.body);
    let _ = request_tx.send(request).await;

    match reply {
        MockReply::Json(body) => {
            let _ = stream.write_all(&http_ok(&body)).await;
        }
        MockReply::Raw(bytes) => {
            let _ = stream.write_all(&bytes).await;
        }
        MockReply::Partial(bytes) => {
            let _ = stream.write_all(&bytes).await;
            wait_for_peer_close(&mut stream).await;
            let _ = closed_tx.send(()).await;
        }
        MockReply::Stall => {
            wait_for_peer_close(&mut stream).await;
            let _ = closed_tx.send(()).await;
        }
        MockReply::Close => {}
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&raw[..pos]).into_owned();
            let length = content_length(&head);
            let start = pos + 4;
            if raw.len() >= start + length {
                let body = String::from_utf8_lossy(&raw[start..start + length]).into_owned();
                return Some(RecordedRequest { head, body });
            }
        }

        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&chunk[..n]);
    }
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn wait_for_peer_close(stream: &mut TcpStream) {
    let mut buf = [0u8; 64];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(_) => continue,
        }
    }
}

/// Wrap a body in a minimal `200 OK` envelope
pub fn http_ok(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.0 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
    .into_bytes()
}

/// Helper to create a mock success response
pub fn mock_response(id: i64, result: serde_json::Value) -> String {
    serde_json::json!({
        "result": result,
        "id": id
    })
    .to_string()
}

/// Helper to create a mock error response
pub fn mock_error_response(id: i64, code: i64, message: &str) -> String {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}

/// Answer a single request or a batch by echoing each call's params as its result
///
/// Batch replies come back in reverse order; notifications get no entry.
pub fn echo_params(body: &str) -> MockReply {
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    let answer = |request: &serde_json::Value| {
        request.get("id").map(|id| {
            serde_json::json!({
                "result": request["params"],
                "id": id
            })
        })
    };

    match value {
        serde_json::Value::Array(requests) => {
            let mut replies: Vec<_> = requests.iter().filter_map(answer).collect();
            replies.reverse();
            MockReply::Json(serde_json::Value::Array(replies).to_string())
        }
        single => match answer(&single) {
            Some(reply) => MockReply::Json(reply.to_string()),
            None => MockReply::Close,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_creation() {
        let server = MockHttpServer::replying(MockReply::Close).await;
        assert!(server.url().starts_with("http://127.0.0.1:"));
        server.shutdown().await;
    }

    #[test]
    fn test_recorded_request_headers() {
        let request = RecordedRequest {
            head: "POST /rpc HTTP/1.0\r\nHost: h:1\r\nContent-Length: 2".to_string(),
            body: "{}".to_string(),
        };
        assert_eq!(request.request_line(), "POST /rpc HTTP/1.0");
        assert_eq!(request.header("content-length"), Some("2"));
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn test_echo_params_reverses_batches() {
        let reply = echo_params(r#"[{"method":"a","params":[1],"id":1},{"method":"b","params":[2],"id":2}]"#);
        match reply {
            MockReply::Json(body) => assert_eq!(body, r#"[{"id":2,"result":[2]},{"id":1,"result":[1]}]"#),
            other => panic!("Expected Json, got {:?}", other),
        }
    }
}
