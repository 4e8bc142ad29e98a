//! Account identities and session descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder the backend reports when nobody is logged in.
pub const NO_ACTIVE_USER: &str = "<none>";

/// A `user@provider` identity.
///
/// The user part is optional: `@provider` stands for the provider alone.
/// Plain provider names are normalised to that form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(address: &str) -> Self {
        if address.contains('@') {
            Self(address.to_string())
        } else {
            Self(format!("@{address}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider part, after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or_default()
    }

    /// User part, before the `@`; empty for provider-only addresses.
    pub fn userpart(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    /// The same provider without a user.
    pub fn domain_only(&self) -> Self {
        Self(format!("@{}", self.domain()))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier.
    pub uuid: String,
    /// Session token, when the backend shares it.
    #[serde(default, alias = "srp_token")]
    pub token: Option<String>,
}

/// Reply of `user/active`: a bare uid or a `{"user": uid}` record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ActiveUser {
    Uid(String),
    Record { user: String },
}

impl ActiveUser {
    pub(crate) fn into_uid(self) -> Option<String> {
        let user = match self {
            Self::Uid(user) | Self::Record { user } => user,
        };
        (!user.is_empty() && user != NO_ACTIVE_USER).then_some(user)
    }
}
