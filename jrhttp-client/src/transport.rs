//! Moving request bytes to the server and reply bytes back
//!
//! The [`Transport`] trait is the seam between the client and the network.
//! [`TcpTransport`] is the real implementation: one TCP connection per call,
//! a hand-framed HTTP/1.0 request, and a read until the server closes.
//!
//! # Connection Lifecycle
//!
//! 1. **Connect**: open a TCP connection to the target
//! 2. **Write**: send the framed request
//! 3. **Read**: collect bytes until end-of-stream
//! 4. **Strip**: cut the HTTP envelope off, return the body
//!
//! The whole sequence shares one deadline. The stream is owned by the call, so
//! it is closed when the call returns, whichever way it returns.
//!
//! # Failure Mapping
//!
//! - connect failed or did not finish in time → `Error::Connection`
//! - connected but the reply did not complete in time → `Error::TransportTimeout`
//! - any other socket failure after connecting → `Error::Io`

use crate::framing;
use crate::target::Target;
use async_trait::async_trait;
use jrhttp_core::{Error, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

/// Everything a transport needs for one round trip
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// Where to send the request
    pub target: &'a Target,
    /// Ready-made `Authorization` header value, if any
    pub auth_header: Option<&'a str>,
    /// Encoded JSON body
    pub body: &'a [u8],
    /// Deadline for the whole exchange
    pub timeout: Duration,
}

/// Sends encoded requests and returns raw reply bodies
///
/// Implementations own connection handling. Nothing is retried at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Full round trip; returns the reply body with the envelope removed
    async fn send(&self, exchange: &Exchange<'_>) -> Result<Vec<u8>>;

    /// Write the request and close without reading a reply
    async fn deliver(&self, exchange: &Exchange<'_>) -> Result<()>;
}

/// HTTP/1.0 over a fresh TCP connection per call
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl TcpTransport {
    /// Create the transport
    pub fn new() -> Self {
        Self
    }

    async fn connect(target: &Target, deadline: Instant, timeout: Duration) -> Result<TcpStream> {
        match timeout_at(deadline, TcpStream::connect((target.host(), target.port()))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => {
                tracing::debug!(url = %target, error = %e, "Connect failed");
                Err(Error::connection(&e))
            }
            Err(_) => Err(Error::Connection {
                message: format!("connect to {} timed out after {:?}", target, timeout),
                code: None,
            }),
        }
    }
}

async fn write_and_read(stream: &mut TcpStream, request: &[u8]) -> Result<Vec<u8>> {
    stream.write_all(request).await.map_err(io_error)?;
    stream.flush().await.map_err(io_error)?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.map_err(io_error)?;
    Ok(raw)
}

async fn write_and_close(stream: &mut TcpStream, request: &[u8]) -> Result<()> {
    stream.write_all(request).await.map_err(io_error)?;
    stream.shutdown().await.map_err(io_error)
}

fn io_error(e: std::io::Error) -> Error {
    Error::Io(e.to_string())
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, exchange: &Exchange<'_>) -> Result<Vec<u8>> {
        let deadline = Instant::now() + exchange.timeout;
        let request = framing::build_request(exchange.target, exchange.auth_header, exchange.body);

        let mut stream = Self::connect(exchange.target, deadline, exchange.timeout).await?;
        tracing::trace!(url = %exchange.target, bytes = request.len(), "Connected, sending request");

        let raw = match timeout_at(deadline, write_and_read(&mut stream, &request)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!(url = %exchange.target, timeout = ?exchange.timeout, "Reply did not complete in time");
                return Err(Error::TransportTimeout(exchange.timeout));
            }
        };
        drop(stream);

        tracing::debug!(
            status = framing::status_code(&raw),
            bytes = raw.len(),
            "Reply received"
        );

        Ok(framing::strip_envelope(&raw).to_vec())
    }

    async fn deliver(&self, exchange: &Exchange<'_>) -> Result<()> {
        let deadline = Instant::now() + exchange.timeout;
        let request = framing::build_request(exchange.target, exchange.auth_header, exchange.body);

        let mut stream = Self::connect(exchange.target, deadline, exchange.timeout).await?;

        match timeout_at(deadline, write_and_close(&mut stream, &request)).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::TransportTimeout(exchange.timeout)),
        }

        tracing::debug!(url = %exchange.target, bytes = request.len(), "Request delivered");
        Ok(())
    }
}
