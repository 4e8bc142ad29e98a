//! Backend events.

use serde_json::Value;

use crate::error::ClientError;

/// An event pushed by the backend, e.g. `("MAIL_SERVICE_STARTED", [...])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub payload: Vec<String>,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: Vec<String>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Decodes the result of an `events/poll` call.
    ///
    /// `null` means no event was available. Anything other than a
    /// `[name, [payload...]]` pair is rejected.
    pub fn from_poll_result(result: Value) -> Result<Option<Self>, ClientError> {
        if result.is_null() {
            return Ok(None);
        }
        let (name, payload): (String, Vec<String>) = serde_json::from_value(result)
            .map_err(|e| ClientError::Protocol(format!("unexpected event shape: {e}")))?;
        Ok(Some(Self { name, payload }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_no_event() {
        assert_eq!(Event::from_poll_result(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_pair_decodes() {
        let event = Event::from_poll_result(json!(["mail", ["ON"]])).unwrap().unwrap();
        assert_eq!(event, Event::new("mail", vec!["ON".to_string()]));
    }

    #[test]
    fn test_empty_payload_decodes() {
        let event = Event::from_poll_result(json!(["KEYMANAGER_DONE_UPLOADING_KEYS", []]))
            .unwrap()
            .unwrap();
        assert!(event.payload.is_empty());
    }

    #[test]
    fn test_rejects_other_shapes() {
        for bad in [
            json!("mail"),
            json!(["mail"]),
            json!(["mail", ["ON"], "extra"]),
            json!(["mail", "ON"]),
            json!({"name": "mail"}),
        ] {
            let error = Event::from_poll_result(bad).unwrap_err();
            assert!(matches!(error, ClientError::Protocol(_)));
        }
    }
}
