//! Keyring value objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Which half of a key pair an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// The secret half.
    Private,
    /// The public half.
    #[default]
    Public,
}

impl KeyKind {
    /// Maps a "private?" flag to a kind.
    #[must_use]
    pub const fn from_private(private: bool) -> Self {
        if private {
            Self::Private
        } else {
            Self::Public
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            other => Err(ClientError::InvalidCommand(format!(
                "unknown key kind '{other}' (expected 'private' or 'public')"
            ))),
        }
    }
}

/// How a key was found and how much it is trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationLevel {
    #[serde(rename = "Weak_Chain")]
    WeakChain,
    #[serde(rename = "Provider_Trust")]
    ProviderTrust,
    #[serde(rename = "Provider_Endorsement")]
    ProviderEndorsement,
    #[serde(rename = "Third_Party_Endorsement")]
    ThirdPartyEndorsement,
    #[serde(rename = "Third_Party_Consensus")]
    ThirdPartyConsensus,
    #[serde(rename = "Historically_Auditing")]
    HistoricallyAuditing,
    #[serde(rename = "Known_Key")]
    KnownKey,
    /// Level assumed by `keys insert` when the caller does not pick one.
    #[default]
    #[serde(rename = "Fingerprint")]
    Fingerprint,
}

impl ValidationLevel {
    /// Every level, in the order the backend lists them.
    pub const ALL: [Self; 8] = [
        Self::WeakChain,
        Self::ProviderTrust,
        Self::ProviderEndorsement,
        Self::ThirdPartyEndorsement,
        Self::ThirdPartyConsensus,
        Self::HistoricallyAuditing,
        Self::KnownKey,
        Self::Fingerprint,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeakChain => "Weak_Chain",
            Self::ProviderTrust => "Provider_Trust",
            Self::ProviderEndorsement => "Provider_Endorsement",
            Self::ThirdPartyEndorsement => "Third_Party_Endorsement",
            Self::ThirdPartyConsensus => "Third_Party_Consensus",
            Self::HistoricallyAuditing => "Historically_Auditing",
            Self::KnownKey => "Known_Key",
            Self::Fingerprint => "Fingerprint",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ClientError::InvalidCommand(format!("unknown validation level '{s}'")))
    }
}

/// Snapshot of a keyring entry as returned by the backend.
///
/// Snapshots are read-only; fetch the key again to observe changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyObject {
    address: String,
    fingerprint: String,
    #[serde(default)]
    length: u32,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    uids: Vec<String>,
    #[serde(default)]
    key_data: String,
    #[serde(default)]
    validation: ValidationLevel,
    #[serde(default)]
    expiry_date: Option<String>,
    #[serde(default)]
    refreshed_at: Option<String>,
    #[serde(default)]
    audited_at: Option<String>,
    #[serde(default)]
    sign_used: bool,
    #[serde(default)]
    enc_used: bool,
}

impl KeyObject {
    /// Email address the key is active for.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Key fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Key size in bits.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Whether this is the secret half.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Kind derived from the private flag.
    pub fn kind(&self) -> KeyKind {
        KeyKind::from_private(self.private)
    }

    /// User ids embedded in the key.
    pub fn uids(&self) -> &[String] {
        &self.uids
    }

    /// Armored key material.
    pub fn key_data(&self) -> &str {
        &self.key_data
    }

    /// Validation level the key was found at.
    pub fn validation(&self) -> ValidationLevel {
        self.validation
    }

    /// Expiry date, if the key expires.
    pub fn expiry_date(&self) -> Option<&str> {
        self.expiry_date.as_deref()
    }

    /// Last refresh of the key.
    pub fn refreshed_at(&self) -> Option<&str> {
        self.refreshed_at.as_deref()
    }

    /// Last audit (not used by the backend yet).
    pub fn audited_at(&self) -> Option<&str> {
        self.audited_at.as_deref()
    }

    /// Whether the key has been used to check signatures.
    pub fn sign_used(&self) -> bool {
        self.sign_used
    }

    /// Whether the key has been used to encrypt.
    pub fn enc_used(&self) -> bool {
        self.enc_used
    }
}
