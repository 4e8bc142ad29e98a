//! Mail service status and credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatcher::Dispatcher;
use crate::domain::Command;
use crate::error::ClientError;
use crate::ports::BackendConnector;

/// Readable status of the mail service.
///
/// Older backends answer with a plain sentence, newer ones with a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MailStatus {
    Text(String),
    Detailed {
        status: String,
        #[serde(default)]
        error: Option<String>,
    },
}

impl MailStatus {
    /// The status line.
    pub fn status(&self) -> &str {
        match self {
            Self::Text(status) | Self::Detailed { status, .. } => status,
        }
    }

    /// Error the service reported alongside its status.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Detailed { error, .. } => error.as_deref(),
        }
    }
}

impl fmt::Display for MailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            Some(error) => write!(f, "{} ({error})", self.status()),
            None => f.write_str(self.status()),
        }
    }
}

/// `mail/*` commands.
pub struct MailApi<C> {
    dispatcher: Dispatcher<C>,
}

impl<C> Clone for MailApi<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: BackendConnector> MailApi<C> {
    pub fn new(dispatcher: Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    pub async fn status(&self) -> Result<MailStatus, ClientError> {
        self.dispatcher.dispatch_as(Command::MailStatus).await
    }

    /// Token the active user presents as IMAP/SMTP password.
    pub async fn get_token(&self) -> Result<String, ClientError> {
        self.dispatcher.dispatch_as(Command::MailGetToken).await
    }
}
