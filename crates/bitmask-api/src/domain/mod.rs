//! Domain Layer
//!
//! Wire-independent value types: commands, the reply envelope, events,
//! account identities and keyring entries. No I/O happens here.

pub mod account;
pub mod command;
pub mod envelope;
pub mod event;
pub mod keys;

pub use account::{AccountAddress, Session, NO_ACTIVE_USER};
pub use command::{Command, Password, Route};
pub use envelope::ResponseEnvelope;
pub use event::Event;
pub use keys::{KeyKind, KeyObject, ValidationLevel};
