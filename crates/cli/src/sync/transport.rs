// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the polling protocol.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP+JSON requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use trek_core::protocol::{SyncRequest, SyncResponse};
use trek_core::StopDetails;

/// Upper bound on a single request, including the body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for transport operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-success HTTP status.
    #[error("server returned {0}")]
    Status(String),

    /// Request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + 'a>>;

/// Transport trait for request/response communication with the server.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport {
    /// Sends one sync request and waits for its response.
    fn request(&self, request: SyncRequest) -> TransportFuture<'_, SyncResponse>;

    /// Fetches the rich details of a single stop.
    fn fetch_details(
        &self,
        id: &str,
        language: &str,
        fingerprint: &str,
    ) -> TransportFuture<'_, StopDetails>;
}

/// HTTP transport using reqwest.
///
/// Sync requests are POSTed as JSON to `{endpoint}/info`; stop details are
/// fetched with a GET on `{endpoint}/details`.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a new HTTP transport for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("trek/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(HttpTransport { client, endpoint: endpoint.into() })
    }

    /// The endpoint this transport talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }
}

impl Transport for HttpTransport {
    fn request(&self, request: SyncRequest) -> TransportFuture<'_, SyncResponse> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url("info"))
                .json(&request)
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
                .error_for_status()
                .map_err(|e| TransportError::Status(e.to_string()))?;

            response
                .json::<SyncResponse>()
                .await
                .map_err(|e| TransportError::SerializationError(e.to_string()))
        })
    }

    fn fetch_details(
        &self,
        id: &str,
        language: &str,
        fingerprint: &str,
    ) -> TransportFuture<'_, StopDetails> {
        let query = [
            ("id", id.to_string()),
            ("language", language.to_string()),
            ("fingerprint", fingerprint.to_string()),
        ];
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("details"))
                .query(&query)
                .send()
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
                .error_for_status()
                .map_err(|e| TransportError::Status(e.to_string()))?;

            response
                .json::<StopDetails>()
                .await
                .map_err(|e| TransportError::SerializationError(e.to_string()))
        })
    }
}
