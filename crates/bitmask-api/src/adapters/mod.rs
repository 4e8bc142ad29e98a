//! Adapters Layer
//!
//! Implementations of [`BackendConnector`](crate::ports::BackendConnector):
//!
//! - `HttpConnector`: the real backend, over HTTP with `reqwest`
//! - `ScriptedConnector`: canned replies for tests, behind the `test-util`
//!   feature

pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use http::HttpConnector;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::{RecordedRequest, ScriptedConnector};
