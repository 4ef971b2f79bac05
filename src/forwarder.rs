//! Best-effort delivery of measurements to the collector.
//!
//! Each measurement is posted exactly once. Failures are returned to the
//! caller, which logs and drops them; nothing is queued or retried.
//!
//! [`Measurement`] stays a pure decode result with no knowledge of names.
//! The caller resolves the tag label from its name table and passes it to
//! [`Forwarder::deliver`] next to the measurement; the label only exists in
//! the outgoing [`Envelope`].

use crate::envelope::Envelope;
use crate::measurement::Measurement;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Default bound on a single delivery.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a single delivery attempt.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("failed to serialize measurement: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("delivery failed: {0}")]
    Transport(String),
    #[error("collector responded with status {0}")]
    Status(u16),
}

/// Outcome of [`Forwarder::deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No collector configured
    Disabled,
    /// Collector accepted the payload with this status
    Sent(u16),
}

type PostFuture<'a> = Pin<Box<dyn Future<Output = Result<u16, ForwardError>> + Send + 'a>>;

/// Request/response exchange with the collector.
pub trait Transport: Send + Sync {
    /// POST a JSON `body` to `url`, returning the response status.
    fn post(&self, url: &str, body: Vec<u8>) -> PostFuture<'_>;
}

/// HTTP transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ForwardError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: Vec<u8>) -> PostFuture<'_> {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| ForwardError::Transport(e.to_string()))?;
            Ok(response.status().as_u16())
        })
    }
}

/// Wraps measurements in envelopes and hands them to a [`Transport`].
pub struct Forwarder {
    endpoint: Option<Url>,
    gateway_id: Option<String>,
    transport: Box<dyn Transport>,
}

impl Forwarder {
    pub fn new(
        endpoint: Option<Url>,
        gateway_id: Option<String>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            gateway_id,
            transport,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Deliver one measurement under the label `name`.
    pub async fn deliver(
        &self,
        measurement: &Measurement,
        name: &str,
    ) -> Result<Delivery, ForwardError> {
        let Some(url) = &self.endpoint else {
            return Ok(Delivery::Disabled);
        };

        let envelope = Envelope::single(
            measurement,
            name,
            self.gateway_id.as_deref(),
            SystemTime::now(),
        );
        let body = envelope.to_json()?;
        tracing::debug!(payload = %String::from_utf8_lossy(&body), "posting measurement");

        let status = self.transport.post(url.as_str(), body).await?;
        tracing::debug!(status, "collector responded");
        if (200..300).contains(&status) {
            Ok(Delivery::Sent(status))
        } else {
            Err(ForwardError::Status(status))
        }
    }
}
