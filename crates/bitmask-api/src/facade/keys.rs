//! Keyring operations.
//!
//! Kinds default to [`KeyKind::Public`]; insertion defaults to
//! [`ValidationLevel::Fingerprint`].

use crate::dispatcher::Dispatcher;
use crate::domain::{Command, KeyKind, KeyObject, ValidationLevel};
use crate::error::ClientError;
use crate::ports::BackendConnector;

/// `keys/*` commands.
pub struct KeysApi<C> {
    dispatcher: Dispatcher<C>,
}

impl<C> Clone for KeysApi<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: BackendConnector> KeysApi<C> {
    pub fn new(dispatcher: Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// All keys of one kind.
    pub async fn list(&self, kind: Option<KeyKind>) -> Result<Vec<KeyObject>, ClientError> {
        self.dispatcher
            .dispatch_as(Command::KeysList {
                kind: kind.unwrap_or_default(),
            })
            .await
    }

    /// The key bound to `address`.
    pub async fn export(
        &self,
        address: &str,
        kind: Option<KeyKind>,
    ) -> Result<KeyObject, ClientError> {
        self.dispatcher
            .dispatch_as(Command::KeysExport {
                address: address.to_string(),
                kind: kind.unwrap_or_default(),
            })
            .await
    }

    /// Add armored key material for `address`.
    pub async fn insert(
        &self,
        address: &str,
        raw_key: &str,
        validation: Option<ValidationLevel>,
    ) -> Result<KeyObject, ClientError> {
        self.dispatcher
            .dispatch_as(Command::KeysInsert {
                address: address.to_string(),
                validation: validation.unwrap_or_default(),
                raw_key: raw_key.to_string(),
            })
            .await
    }

    /// Remove the key bound to `address`.
    pub async fn delete(&self, address: &str, kind: Option<KeyKind>) -> Result<(), ClientError> {
        self.dispatcher
            .dispatch(Command::KeysDelete {
                address: address.to_string(),
                kind: kind.unwrap_or_default(),
            })
            .await?;
        Ok(())
    }
}
