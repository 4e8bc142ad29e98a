//! The `{result, error}` reply envelope.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ClientError;

/// Reply body of every backend command.
///
/// Exactly one of `result` and `error` is populated. Commands may accept
/// both set to `null` instead (see [`Command::allows_empty_result`]). Both
/// keys must be present; the outer `Option` records whether a key was sent
/// at all.
///
/// [`Command::allows_empty_result`]: crate::domain::Command::allows_empty_result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, deserialize_with = "present")]
    result: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    error: Option<Option<String>>,
}

/// Maps a key that is present (even as `null`) to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ResponseEnvelope {
    /// Parses a reply body.
    pub fn from_body(body: &str) -> Result<Self, ClientError> {
        serde_json::from_str(body).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    /// Resolves the envelope into the command result.
    ///
    /// Returns `Ok(None)` only for an empty envelope when `allow_empty` is
    /// set. A populated `error` becomes [`ClientError::Backend`].
    pub fn into_result(self, allow_empty: bool) -> Result<Option<Value>, ClientError> {
        let (Some(result), Some(error)) = (self.result, self.error) else {
            return Err(ClientError::Protocol(
                "envelope must carry both 'result' and 'error' keys".to_string(),
            ));
        };
        match (result, error) {
            (Some(_), Some(error)) => Err(ClientError::Protocol(format!(
                "envelope carries both a result and an error ({error})"
            ))),
            (None, Some(error)) => Err(ClientError::Backend(error)),
            (Some(result), None) => Ok(Some(result)),
            (None, None) if allow_empty => Ok(None),
            (None, None) => Err(ClientError::Protocol(
                "envelope carries neither a result nor an error".to_string(),
            )),
        }
    }
}
