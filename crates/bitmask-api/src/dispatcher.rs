//! Command dispatcher shared by the façades and the event poller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::Command;
use crate::error::ClientError;
use crate::ports::BackendConnector;
use crate::transport::Transport;

/// Cheap-to-clone handle issuing commands over a shared [`Transport`].
///
/// Calls are independent: several may be in flight at once and the backend
/// may answer them in any order.
pub struct Dispatcher<C> {
    transport: Arc<Transport<C>>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<C: BackendConnector> Dispatcher<C> {
    pub fn new(connector: C) -> Self {
        Self {
            transport: Arc::new(Transport::new(connector)),
        }
    }

    pub fn connector(&self) -> &C {
        self.transport.connector()
    }

    /// Issue a command and return its raw result.
    pub async fn dispatch(&self, command: Command) -> Result<Value, ClientError> {
        self.transport.call(&command).await
    }

    /// Issue a command and decode its result into `R`.
    ///
    /// A result of the wrong shape is a [`ClientError::Protocol`].
    pub async fn dispatch_as<R: DeserializeOwned>(&self, command: Command) -> Result<R, ClientError> {
        let route = command.route();
        let value = self.dispatch(command).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::Protocol(format!("unexpected result for {route}: {e}")))
    }
}
