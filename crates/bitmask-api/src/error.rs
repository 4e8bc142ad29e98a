//! Error types for the Bitmask API client.
//!
//! Every failure a caller can observe is a [`ClientError`]. Messages are
//! meant to be shown to the user as-is: backend errors are carried verbatim
//! because the backend already produces readable (and localised) text.

use thiserror::Error;

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend could not be reached.
    Network,
    /// The backend was reached but the exchange itself failed
    /// (non-2xx status or an unparseable reply).
    Transport,
    /// The backend processed the request and reported a domain error.
    Backend,
    /// Credentials were rejected.
    Auth,
    /// The caller misused the client (bad command, bad configuration).
    Usage,
}

/// Errors surfaced by the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never reached the backend (refused, timed out, DNS).
    ///
    /// The user-facing message is deliberately generic; `reason` keeps the
    /// low-level cause for logs.
    #[error("Network Error")]
    Network { reason: String },

    /// The backend answered with a non-success status.
    #[error("{status_text}")]
    Transport { status: u16, status_text: String },

    /// The reply could not be interpreted (invalid JSON, broken envelope,
    /// unexpected result shape).
    #[error("Malformed backend response: {0}")]
    Protocol(String),

    /// The backend reported an error for this command.
    #[error("{0}")]
    Backend(String),

    /// The backend rejected the supplied credentials.
    #[error("{0}")]
    Auth(String),

    /// A command could not be built from the supplied segments.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The event poller was started twice for the same session.
    #[error("Event poller is already running for this session")]
    PollerRunning,
}

impl ClientError {
    /// Builds a network error from any displayable cause.
    pub fn network(reason: impl ToString) -> Self {
        Self::Network {
            reason: reason.to_string(),
        }
    }

    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Transport { .. } | Self::Protocol(_) => ErrorKind::Transport,
            Self::Backend(_) => ErrorKind::Backend,
            Self::Auth(_) => ErrorKind::Auth,
            Self::InvalidCommand(_) | Self::Configuration(_) | Self::PollerRunning => {
                ErrorKind::Usage
            }
        }
    }

    /// Whether repeating the same request later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Transport)
    }

    /// Reclassifies a backend error as a credential failure.
    ///
    /// Other variants pass through untouched.
    #[must_use]
    pub fn into_auth(self) -> Self {
        match self {
            Self::Backend(message) => Self::Auth(message),
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;
