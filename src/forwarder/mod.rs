//! Message forwarding to the remote HTTP endpoint
//!
//! The forwarder delivers one decoded message per call as an HTTP POST with
//! a JSON body. Delivery is best-effort and at-most-once: a failed POST is
//! reported to the caller and the message is discarded, never retried.

use crate::error::RelayError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Destination for decoded messages.
///
/// The listener only depends on this trait, so tests can substitute a
/// recording implementation for the real HTTP client.
#[async_trait]
pub trait Forward: Send + Sync {
    /// Deliver one message. Errors are local to this message; the caller
    /// logs them and continues.
    async fn forward(&self, message: &Value) -> Result<(), RelayError>;
}

/// HTTP forwarder that POSTs each message to a fixed URL.
pub struct HttpForwarder {
    client: reqwest::Client,
    url: Url,
}

impl HttpForwarder {
    /// Create a forwarder for the given endpoint.
    ///
    /// The timeout bounds the whole request, connection setup included.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpForwarder { client, url })
    }

    /// Endpoint this forwarder delivers to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Forward for HttpForwarder {
    async fn forward(&self, message: &Value) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            debug!("Relayed message to {}", self.url);
            Ok(())
        } else {
            Err(RelayError::Status(status.as_u16()))
        }
    }
}
