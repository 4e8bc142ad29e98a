//! Bitmask API - typed client for the local Bitmask backend.
//!
//! Commands are posted as JSON arrays to `<base_url>/<namespace>/<verb>` and
//! answered with a `{"result": ..., "error": ...}` envelope. Events are
//! fetched by long-polling `events/poll` from a single background task.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         BitmaskClient                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌─────────┐  │
//! │  │ UserApi  │ │ MailApi  │ │ KeysApi  │ │EventsApi │ │ Account │  │
//! │  └────┬─────┘ └────┬─────┘ └────┬─────┘ └────┬─────┘ └────┬────┘  │
//! │       └────────────┴─────┬──────┴────────────┴────────────┘       │
//! │                          ▼                                        │
//! │                   ┌────────────┐         ┌─────────────────┐      │
//! │                   │ Dispatcher │◄────────│   EventPoller   │      │
//! │                   └─────┬──────┘         └───────┬─────────┘      │
//! │                         ▼                        ▼                │
//! │                   ┌────────────┐   ┌─────────────────────────┐    │
//! │                   │ Transport  │   │ HandlerRegistry/Stream  │    │
//! │                   └─────┬──────┘   └─────────────────────────┘    │
//! └─────────────────────────┼────────────────────────────────────────┘
//!                           ▼
//!                  BackendConnector (HTTP / scripted)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use bitmask_api::{BitmaskClient, ClientConfig, Event, HttpConnector};
//!
//! let client = BitmaskClient::<HttpConnector>::connect(ClientConfig::from_env())?;
//! let mut account = client.account("alice@example.org");
//! account.login("secret").await?;
//!
//! client.events().register("MAIL_SERVICE_STARTED", |event: &Event| {
//!     println!("mail is up: {:?}", event.payload);
//! }).await?;
//! let mut events = client.start_events()?;
//! while let Some(event) = events.next_event().await { /* ... */ }
//! ```
//!
//! # Errors
//!
//! Every operation returns [`ClientError`]. Network failures read
//! "Network Error"; backend failures carry the backend's message verbatim.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::expect_used))]

pub mod adapters;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod events;
pub mod facade;
pub mod ports;
pub mod transport;

pub use adapters::HttpConnector;
#[cfg(any(test, feature = "test-util"))]
pub use adapters::{RecordedRequest, ScriptedConnector};
pub use client::BitmaskClient;
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use domain::{
    AccountAddress, Command, Event, KeyKind, KeyObject, Password, ResponseEnvelope, Route,
    Session, ValidationLevel,
};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use events::{EventHandler, EventPoller, EventStream, HandlerRegistry, PollerHandle, PollerState};
pub use facade::{Account, EventsApi, KeysApi, MailApi, MailStatus, UserApi};
pub use ports::{BackendConnector, WireReply};
pub use transport::Transport;
