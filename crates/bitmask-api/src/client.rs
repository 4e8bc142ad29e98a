//! Client session: one transport, one handler registry, at most one poller.

use parking_lot::Mutex;
use tracing::info;

use crate::adapters::HttpConnector;
use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ClientError;
use crate::events::{EventPoller, EventStream, HandlerRegistry, PollerHandle, PollerState};
use crate::facade::{Account, EventsApi, KeysApi, MailApi, UserApi};
use crate::ports::BackendConnector;

/// Entry point of the API.
///
/// Façades handed out by the client share its transport and its handler
/// registry. Command calls never wait for the event poller.
pub struct BitmaskClient<C> {
    dispatcher: Dispatcher<C>,
    registry: HandlerRegistry,
    config: ClientConfig,
    poller: Mutex<Option<PollerHandle>>,
}

impl BitmaskClient<HttpConnector> {
    /// Client talking HTTP to `config.base_url`.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let connector = HttpConnector::new(&config)?;
        info!(base_url = %config.base_url, "Bitmask client configured");
        Ok(Self::with_connector(connector, config))
    }

    /// Client configured from `BITMASK_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::connect(ClientConfig::from_env())
    }
}

impl<C: BackendConnector + 'static> BitmaskClient<C> {
    /// Client over an arbitrary connector.
    pub fn with_connector(connector: C, config: ClientConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(connector),
            registry: HandlerRegistry::new(),
            config,
            poller: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn user(&self) -> UserApi<C> {
        UserApi::new(self.dispatcher.clone())
    }

    pub fn mail(&self) -> MailApi<C> {
        MailApi::new(self.dispatcher.clone())
    }

    pub fn keys(&self) -> KeysApi<C> {
        KeysApi::new(self.dispatcher.clone())
    }

    pub fn events(&self) -> EventsApi<C> {
        EventsApi::new(self.dispatcher.clone(), self.registry.clone())
    }

    /// Logged out account handle for `address`.
    pub fn account(&self, address: &str) -> Account<C> {
        Account::new(self.user(), address)
    }

    /// Start long-polling for events.
    ///
    /// Registered handlers run on the poller task; every delivered event is
    /// also yielded by the returned stream.
    ///
    /// # Errors
    ///
    /// [`ClientError::PollerRunning`] if this client already polls.
    pub fn start_events(&self) -> Result<EventStream, ClientError> {
        let mut slot = self.poller.lock();
        if slot.as_ref().is_some_and(PollerHandle::is_running) {
            return Err(ClientError::PollerRunning);
        }

        let (poller, stream) = EventPoller::new(
            self.dispatcher.clone(),
            self.registry.clone(),
            self.config.poll_backoff,
        )
        .with_stream(self.config.event_buffer);
        *slot = Some(poller.spawn());
        Ok(stream)
    }

    /// Stop the poller, if any, and wait for it to exit.
    pub async fn stop_events(&self) {
        let handle = self.poller.lock().take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Phase of the poller; `None` if it was never started or was stopped.
    pub fn poller_state(&self) -> Option<PollerState> {
        self.poller.lock().as_ref().map(PollerHandle::state)
    }
}
