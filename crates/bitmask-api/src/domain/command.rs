//! Backend commands.
//!
//! Every backend operation is one [`Command`] variant with typed arguments.
//! A command knows its [`Route`] (the `<namespace>/<verb>` path) and the
//! positional arguments that make up the JSON array body. Commands built from
//! untyped text go through [`Command::parse`], which rejects unknown routes
//! and wrong arities before anything reaches the network.

use std::fmt;

use crate::domain::keys::{KeyKind, ValidationLevel};
use crate::error::ClientError;

/// `<namespace>/<verb>` destination of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub namespace: &'static str,
    pub verb: &'static str,
}

impl Route {
    pub const USER_ACTIVE: Self = Self::new("user", "active");
    pub const USER_CREATE: Self = Self::new("user", "create");
    pub const USER_AUTHENTICATE: Self = Self::new("user", "authenticate");
    pub const USER_LOGOUT: Self = Self::new("user", "logout");
    pub const MAIL_STATUS: Self = Self::new("mail", "status");
    pub const MAIL_GET_TOKEN: Self = Self::new("mail", "get-token");
    pub const KEYS_LIST: Self = Self::new("keys", "list");
    pub const KEYS_EXPORT: Self = Self::new("keys", "export");
    pub const KEYS_INSERT: Self = Self::new("keys", "insert");
    pub const KEYS_DELETE: Self = Self::new("keys", "delete");
    pub const EVENTS_POLL: Self = Self::new("events", "poll");
    pub const EVENTS_REGISTER: Self = Self::new("events", "register");
    pub const EVENTS_UNREGISTER: Self = Self::new("events", "unregister");

    /// Every route the backend API exposes.
    pub const ALL: [Self; 13] = [
        Self::USER_ACTIVE,
        Self::USER_CREATE,
        Self::USER_AUTHENTICATE,
        Self::USER_LOGOUT,
        Self::MAIL_STATUS,
        Self::MAIL_GET_TOKEN,
        Self::KEYS_LIST,
        Self::KEYS_EXPORT,
        Self::KEYS_INSERT,
        Self::KEYS_DELETE,
        Self::EVENTS_POLL,
        Self::EVENTS_REGISTER,
        Self::EVENTS_UNREGISTER,
    ];

    pub const fn new(namespace: &'static str, verb: &'static str) -> Self {
        Self { namespace, verb }
    }

    /// Looks up a known route by its text segments.
    pub fn find(namespace: &str, verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|route| route.namespace == namespace && route.verb == verb)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.verb)
    }
}

/// A password that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the clear-text secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Password {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// A backend command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Which user is logged in.
    UserActive,
    /// Register a new account.
    UserCreate { uid: String, password: Password },
    /// Log in.
    UserAuthenticate { uid: String, password: Password },
    /// Log out `uid`, or the active user when `None`.
    UserLogout { uid: Option<String> },
    /// Readable status of the mail service.
    MailStatus,
    /// Token used as IMAP/SMTP password for the active user.
    MailGetToken,
    /// List keys of one kind.
    KeysList { kind: KeyKind },
    /// Fetch the key bound to an address.
    KeysExport { address: String, kind: KeyKind },
    /// Add key material for an address.
    KeysInsert {
        address: String,
        validation: ValidationLevel,
        raw_key: String,
    },
    /// Remove the key bound to an address.
    KeysDelete { address: String, kind: KeyKind },
    /// Long-poll for the next event.
    EventsPoll,
    /// Ask the backend to deliver an event.
    EventsRegister { event: String },
    /// Ask the backend to stop delivering an event.
    EventsUnregister { event: String },
}

impl Command {
    /// Destination of this command.
    pub fn route(&self) -> Route {
        match self {
            Self::UserActive => Route::USER_ACTIVE,
            Self::UserCreate { .. } => Route::USER_CREATE,
            Self::UserAuthenticate { .. } => Route::USER_AUTHENTICATE,
            Self::UserLogout { .. } => Route::USER_LOGOUT,
            Self::MailStatus => Route::MAIL_STATUS,
            Self::MailGetToken => Route::MAIL_GET_TOKEN,
            Self::KeysList { .. } => Route::KEYS_LIST,
            Self::KeysExport { .. } => Route::KEYS_EXPORT,
            Self::KeysInsert { .. } => Route::KEYS_INSERT,
            Self::KeysDelete { .. } => Route::KEYS_DELETE,
            Self::EventsPoll => Route::EVENTS_POLL,
            Self::EventsRegister { .. } => Route::EVENTS_REGISTER,
            Self::EventsUnregister { .. } => Route::EVENTS_UNREGISTER,
        }
    }

    /// Positional arguments, in the order the backend expects them.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Self::UserActive | Self::MailStatus | Self::MailGetToken | Self::EventsPoll => {
                Vec::new()
            }
            Self::UserCreate { uid, password } | Self::UserAuthenticate { uid, password } => {
                vec![uid.clone(), password.expose().to_string()]
            }
            Self::UserLogout { uid } => vec![uid.clone().unwrap_or_default()],
            Self::KeysList { kind } => vec![kind.as_str().to_string()],
            Self::KeysExport { address, kind } | Self::KeysDelete { address, kind } => {
                vec![address.clone(), kind.as_str().to_string()]
            }
            Self::KeysInsert {
                address,
                validation,
                raw_key,
            } => vec![
                address.clone(),
                validation.as_str().to_string(),
                raw_key.clone(),
            ],
            Self::EventsRegister { event } | Self::EventsUnregister { event } => {
                vec![event.clone()]
            }
        }
    }

    /// JSON array body sent with the request.
    pub fn body(&self) -> Result<String, ClientError> {
        serde_json::to_string(&self.arguments())
            .map_err(|e| ClientError::InvalidCommand(format!("cannot encode {}: {e}", self.route())))
    }

    /// Whether `{"result": null, "error": null}` is a legitimate reply.
    ///
    /// The event poll uses it when the long poll expired without an event.
    /// The backend also answers a logout for a user that is not logged in
    /// this way.
    pub const fn allows_empty_result(&self) -> bool {
        matches!(self, Self::EventsPoll | Self::UserLogout { .. })
    }

    /// Builds a command from text segments, as typed on a command line.
    ///
    /// Arguments follow the wire order. Optional trailing arguments may be
    /// omitted: key kinds default to `public` and `keys insert` accepts
    /// `<address> <raw_key>` with the `Fingerprint` validation level.
    pub fn parse(namespace: &str, verb: &str, args: &[String]) -> Result<Self, ClientError> {
        let command = match (namespace, verb, args) {
            ("user", "active", []) => Self::UserActive,
            ("user", "create", [uid, password]) => Self::UserCreate {
                uid: uid.clone(),
                password: Password::new(password.as_str()),
            },
            ("user", "authenticate", [uid, password]) => Self::UserAuthenticate {
                uid: uid.clone(),
                password: Password::new(password.as_str()),
            },
            ("user", "logout", []) => Self::UserLogout { uid: None },
            ("user", "logout", [uid]) => Self::UserLogout {
                uid: Some(uid.clone()),
            },
            ("mail", "status", []) => Self::MailStatus,
            ("mail", "get-token", []) => Self::MailGetToken,
            ("keys", "list", []) => Self::KeysList {
                kind: KeyKind::default(),
            },
            ("keys", "list", [kind]) => Self::KeysList { kind: kind.parse()? },
            ("keys", "export", [address]) => Self::KeysExport {
                address: address.clone(),
                kind: KeyKind::default(),
            },
            ("keys", "export", [address, kind]) => Self::KeysExport {
                address: address.clone(),
                kind: kind.parse()?,
            },
            ("keys", "insert", [address, raw_key]) => Self::KeysInsert {
                address: address.clone(),
                validation: ValidationLevel::default(),
                raw_key: raw_key.clone(),
            },
            ("keys", "insert", [address, validation, raw_key]) => Self::KeysInsert {
                address: address.clone(),
                validation: validation.parse()?,
                raw_key: raw_key.clone(),
            },
            ("keys", "delete", [address]) => Self::KeysDelete {
                address: address.clone(),
                kind: KeyKind::default(),
            },
            ("keys", "delete", [address, kind]) => Self::KeysDelete {
                address: address.clone(),
                kind: kind.parse()?,
            },
            ("events", "poll", []) => Self::EventsPoll,
            ("events", "register", [event]) => Self::EventsRegister {
                event: event.clone(),
            },
            ("events", "unregister", [event]) => Self::EventsUnregister {
                event: event.clone(),
            },
            _ => {
                return Err(match Route::find(namespace, verb) {
                    Some(route) => ClientError::InvalidCommand(format!(
                        "wrong number of arguments for {route}: got {}",
                        args.len()
                    )),
                    None => {
                        ClientError::InvalidCommand(format!("unknown command {namespace}/{verb}"))
                    }
                })
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_authenticate_body_order() {
        let command = Command::UserAuthenticate {
            uid: "uid".to_string(),
            password: Password::new("password"),
        };
        assert_eq!(command.route().to_string(), "user/authenticate");
        assert_eq!(command.body().unwrap(), r#"["uid","password"]"#);
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let command = Command::UserCreate {
            uid: "alice@example.org".to_string(),
            password: Password::new("hunter2"),
        };
        let debug = format!("{command:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("Password(***)"));
    }

    #[test]
    fn test_logout_without_uid_sends_empty_string() {
        let command = Command::UserLogout { uid: None };
        assert_eq!(command.body().unwrap(), r#"[""]"#);
    }

    #[test]
    fn test_insert_puts_validation_before_key() {
        let command = Command::KeysInsert {
            address: "bob@example.org".to_string(),
            validation: ValidationLevel::Fingerprint,
            raw_key: "KEY".to_string(),
        };
        assert_eq!(
            command.arguments(),
            strings(&["bob@example.org", "Fingerprint", "KEY"])
        );
    }

    #[test]
    fn test_poll_has_empty_array_body() {
        assert_eq!(Command::EventsPoll.body().unwrap(), "[]");
        assert!(Command::EventsPoll.allows_empty_result());
        assert!(!Command::MailStatus.allows_empty_result());
    }

    #[test]
    fn test_logout_accepts_empty_result() {
        assert!(Command::UserLogout { uid: None }.allows_empty_result());
        assert!(!Command::UserActive.allows_empty_result());
    }

    #[test]
    fn test_parse_applies_defaults() {
        let list = Command::parse("keys", "list", &[]).unwrap();
        assert_eq!(
            list,
            Command::KeysList {
                kind: KeyKind::Public
            }
        );

        let insert = Command::parse("keys", "insert", &strings(&["a@b.org", "KEY"])).unwrap();
        assert_eq!(
            insert.arguments(),
            strings(&["a@b.org", "Fingerprint", "KEY"])
        );
    }

    #[test]
    fn test_parse_round_trips_routes() {
        let export =
            Command::parse("keys", "export", &strings(&["a@b.org", "private"])).unwrap();
        assert_eq!(export.route(), Route::KEYS_EXPORT);
        assert_eq!(export.arguments(), strings(&["a@b.org", "private"]));

        let token = Command::parse("mail", "get-token", &[]).unwrap();
        assert_eq!(token, Command::MailGetToken);
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let error = Command::parse("eip", "start", &[]).unwrap_err();
        assert_eq!(error.to_string(), "Invalid command: unknown command eip/start");
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        let error = Command::parse("user", "authenticate", &strings(&["only-uid"])).unwrap_err();
        assert!(error.to_string().contains("wrong number of arguments for user/authenticate"));
    }

    #[test]
    fn test_parse_rejects_bad_payload_values() {
        assert!(Command::parse("keys", "list", &strings(&["secret"])).is_err());
        assert!(Command::parse("keys", "insert", &strings(&["a@b.org", "Trusted", "KEY"])).is_err());
    }

    #[test]
    fn test_every_route_is_findable() {
        for route in Route::ALL {
            assert_eq!(Route::find(route.namespace, route.verb), Some(route));
        }
        assert_eq!(Route::find("events", "emit"), None);
    }
}
