//! Command transport.
//!
//! Turns one [`Command`] into exactly one connector call and exactly one
//! result: non-2xx replies become [`ClientError::Transport`], the body is
//! read as a [`ResponseEnvelope`], and a populated `error` field becomes
//! [`ClientError::Backend`]. Nothing is retried here.

use serde_json::Value;
use tracing::debug;

use crate::domain::{Command, ResponseEnvelope};
use crate::error::ClientError;
use crate::ports::{BackendConnector, WireReply};

/// Envelope-aware wrapper around a [`BackendConnector`].
pub struct Transport<C> {
    connector: C,
}

impl<C: BackendConnector> Transport<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Issue `command` and resolve its result.
    ///
    /// Returns `Value::Null` only for commands that accept an empty
    /// envelope (the event poll and logout).
    pub async fn call(&self, command: &Command) -> Result<Value, ClientError> {
        let route = command.route();
        let body = command.body()?;

        let outcome = match self.connector.post(route, body).await {
            Ok(reply) => interpret(command, reply),
            Err(error) => Err(error),
        };

        match &outcome {
            Ok(_) => debug!(%route, "Backend call succeeded"),
            Err(ClientError::Network { reason }) => {
                debug!(%route, reason = %reason, "Backend unreachable")
            }
            Err(error) => debug!(%route, error = %error, "Backend call failed"),
        }
        outcome
    }
}

fn interpret(command: &Command, reply: WireReply) -> Result<Value, ClientError> {
    if !reply.is_success() {
        return Err(ClientError::Transport {
            status: reply.status,
            status_text: reply.status_text,
        });
    }
    let envelope = ResponseEnvelope::from_body(&reply.body)?;
    Ok(envelope
        .into_result(command.allows_empty_result())?
        .unwrap_or(Value::Null))
}
