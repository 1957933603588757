//! HTTP transport for archive downloads
//!
//! The pipeline only needs "GET this URL, give me the body"; the [`Transport`]
//! trait keeps that seam narrow so tests can swap in an in-memory transport.

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::AUTHORIZATION;
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, acquisition};

/// Connect timeout for archive downloads
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure of a single GET
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server answered with a non-success status
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("{0}")]
    Network(String),
}

/// Blocking GET returning the response body
pub trait Transport {
    fn get(&self, url: &str, token: Option<&str>) -> std::result::Result<Vec<u8>, TransportError>;
}

/// `reqwest` backed transport
pub struct HttpTransport {
    client: Client,
}

/// `User-Agent` sent with every request; GitHub rejects requests without one
const USER_AGENT: &str = concat!("modfetch/", env!("CARGO_PKG_VERSION"));

/// Client settings: rustls, TLS 1.2 or newer, and explicit timeouts
fn client_builder(timeout: Duration) -> ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::from_builder(client_builder(timeout))
    }

    fn from_builder(builder: ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| acquisition::client_failed(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, token: Option<&str>) -> std::result::Result<Vec<u8>, TransportError> {
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "archive response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}
