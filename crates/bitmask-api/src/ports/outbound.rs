//! Outbound Ports (Driven Ports)
//!
//! The client needs exactly one thing from the outside world: a way to POST
//! a body to a route and read the raw reply back. Envelope handling lives in
//! [`Transport`](crate::transport::Transport) so every connector shares it.

use async_trait::async_trait;

use crate::domain::Route;
use crate::error::ClientError;

/// Raw reply to a POST, before any envelope interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl WireReply {
    /// A `200 OK` reply carrying `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// A reply with an arbitrary status and empty body.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Connection to the backend API (Driven Port).
///
/// Implementations issue exactly one request per call and never retry.
/// The only error they report is [`ClientError::Network`]; any reply that
/// arrived, whatever its status, is returned as a [`WireReply`].
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// POST `body` to `route`.
    async fn post(&self, route: Route, body: String) -> Result<WireReply, ClientError>;
}
