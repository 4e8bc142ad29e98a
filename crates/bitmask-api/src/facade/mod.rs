//! Domain Façades
//!
//! Typed operations grouped by backend namespace. Every operation compiles
//! to exactly one [`Command`](crate::domain::Command) and surfaces transport
//! errors unchanged.

pub mod account;
pub mod events;
pub mod keys;
pub mod mail;
pub mod user;

pub use account::Account;
pub use events::EventsApi;
pub use keys::KeysApi;
pub use mail::{MailApi, MailStatus};
pub use user::UserApi;
