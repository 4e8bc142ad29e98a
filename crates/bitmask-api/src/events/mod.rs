//! Event delivery: handler registry, long-poll loop and event stream.

pub mod poller;
pub mod registry;
pub mod stream;

pub use poller::{EventPoller, PollerHandle, PollerState};
pub use registry::{EventHandler, HandlerRegistry};
pub use stream::EventStream;
