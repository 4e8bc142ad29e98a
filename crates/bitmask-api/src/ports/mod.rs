//! Ports Layer
//!
//! Defines the interfaces (traits) the client depends on.

pub mod outbound;

pub use outbound::{BackendConnector, WireReply};
