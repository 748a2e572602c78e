//! Transport seam between the API client and the network.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` only ever sees these traits. The browser build plugs in
//! `browser::GlooTransport` and `browser::WindowNavigator`; tests plug in
//! recording doubles.

use async_trait::async_trait;

use super::request::ApiRequest;

/// A response as it came off the wire, before any interpretation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, status_text: String::new(), body: body.into() }
    }

    /// Any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be assembled (bad header, form encoding).
    #[error("failed to build request: {0}")]
    Build(String),
    /// The request was sent but no response arrived. May carry no message.
    #[error("{0}")]
    Network(String),
}

impl TransportError {
    /// The underlying message, if there is one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let raw = match self {
            Self::Build(msg) | Self::Network(msg) => msg.as_str(),
        };
        if raw.trim().is_empty() { None } else { Some(raw) }
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry and must not interpret status codes.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// Performs full page loads, discarding all client-side state.
pub trait PageNavigator: Send + Sync {
    fn hard_navigate(&self, href: &str);
}
