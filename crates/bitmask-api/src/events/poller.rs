//! # Event Poller
//!
//! A single supervising task long-polls `events/poll`, hands each event to
//! the [`HandlerRegistry`] and the optional [`EventStream`], then polls
//! again.
//!
//! ```text
//!            ┌──────── empty reply ────────┐
//!            ▼                             │
//!   Idle ─► Polling ── event ──► Dispatching
//!            ▲  │                          │
//!            │  └── failure ──► Waiting    │
//!            │        (fixed backoff)      │
//!            └──────────────┴──────────────┘
//! ```
//!
//! - At most one poll is in flight: the next poll is only issued after the
//!   previous reply was fully dispatched.
//! - Handlers and the stream never hold the loop back: an unread stream
//!   only loses events, it does not stall polling.
//! - Failures of any kind wait for the configured backoff and try again. The
//!   backoff never grows and the loop never gives up on its own.
//! - The loop ends when [`PollerHandle::stop`] is called or the handle is
//!   dropped.

use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::dispatcher::Dispatcher;
use crate::domain::{Command, Event};
use crate::error::ClientError;
use crate::events::registry::HandlerRegistry;
use crate::events::stream::EventStream;
use crate::ports::BackendConnector;

/// Observable phase of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollerState {
    /// Spawned, first poll not issued yet.
    Idle,
    /// A poll request is in flight.
    Polling,
    /// Handlers for the last event are running.
    Dispatching,
    /// Sleeping after a failed poll.
    Waiting,
    /// The loop has exited.
    Stopped,
}

/// Configured poll loop, ready to be spawned.
pub struct EventPoller<C> {
    dispatcher: Dispatcher<C>,
    registry: HandlerRegistry,
    backoff: Duration,
    sink: Option<mpsc::Sender<Event>>,
}

impl<C: BackendConnector + 'static> EventPoller<C> {
    pub fn new(dispatcher: Dispatcher<C>, registry: HandlerRegistry, backoff: Duration) -> Self {
        Self {
            dispatcher,
            registry,
            backoff,
            sink: None,
        }
    }

    /// Also forward delivered events to a stream buffering up to `buffer`
    /// events.
    ///
    /// Forwarding never waits: when the consumer falls `buffer` events
    /// behind, further events skip the stream (handlers still run) until it
    /// catches up.
    pub fn with_stream(mut self, buffer: usize) -> (Self, EventStream) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        self.sink = Some(sender);
        (self, EventStream::new(receiver))
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(PollerState::Idle);
        let task = tokio::spawn(self.run(shutdown_rx, state_tx));

        PollerHandle {
            shutdown: Some(shutdown_tx),
            state: state_rx,
            task: Some(task),
        }
    }

    async fn run(mut self, mut shutdown: oneshot::Receiver<()>, state: watch::Sender<PollerState>) {
        info!(backoff_ms = self.backoff.as_millis() as u64, "Event poller started");

        loop {
            state.send_replace(PollerState::Polling);
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                Ok(Some(event)) => {
                    state.send_replace(PollerState::Dispatching);
                    self.deliver(event);
                }
                Ok(None) => {
                    // Long poll expired without an event
                    trace!("No event available");
                }
                Err(error) => {
                    warn!(
                        error = %error,
                        retry_in_ms = self.backoff.as_millis() as u64,
                        "Event poll failed"
                    );
                    state.send_replace(PollerState::Waiting);
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.backoff) => {}
                    }
                }
            }
        }

        state.send_replace(PollerState::Stopped);
        info!("Event poller stopped");
    }

    async fn poll_once(&self) -> Result<Option<Event>, ClientError> {
        let result = self.dispatcher.dispatch(Command::EventsPoll).await?;
        Event::from_poll_result(result)
    }

    fn deliver(&mut self, event: Event) {
        if !self.registry.dispatch(&event) {
            trace!(event = %event.name, "Dropping event without handler");
            return;
        }
        debug!(event = %event.name, payload = ?event.payload, "Event delivered");

        let Some(sink) = &self.sink else {
            return;
        };
        match sink.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(event = %event.name, "Event stream full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Event stream consumer went away");
                self.sink = None;
            }
        }
    }
}

/// Control handle of a running poller.
///
/// Dropping the handle stops the loop as well.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    state: watch::Receiver<PollerState>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Current phase of the loop.
    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Receiver notified on every phase change.
    pub fn watch_state(&self) -> watch::Receiver<PollerState> {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// An in-flight poll or backoff is abandoned.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(error = %error, "Event poller task ended abnormally");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedConnector;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn poller(connector: &ScriptedConnector, registry: &HandlerRegistry) -> EventPoller<ScriptedConnector> {
        EventPoller::new(
            Dispatcher::new(connector.clone()),
            registry.clone(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reply_polls_again_immediately() {
        let connector = ScriptedConnector::new();
        connector.push_empty().push_empty();
        let registry = HandlerRegistry::new();

        let handle = poller(&connector, &registry).spawn();
        connector.wait_for_requests(3).await;
        handle.stop().await;

        let requests = connector.requests();
        assert_eq!(requests[1].at, requests[0].at);
        assert_eq!(requests[2].at, requests[1].at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_waits_for_fixed_backoff() {
        let connector = ScriptedConnector::new();
        connector
            .push_failure(ClientError::network("refused"))
            .push_failure(ClientError::network("refused"));
        let registry = HandlerRegistry::new();

        let handle = poller(&connector, &registry).spawn();
        connector.wait_for_requests(3).await;
        handle.stop().await;

        let requests = connector.requests();
        assert_eq!(requests[1].at - requests[0].at, Duration::from_secs(5));
        assert_eq!(requests[2].at - requests[1].at, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unregistered_event_is_dropped() {
        let connector = ScriptedConnector::new();
        connector.push_result(json!(["vpn", ["UP"]])).push_empty();
        let registry = HandlerRegistry::new();
        let (poller, mut stream) = poller(&connector, &registry).with_stream(4);

        let handle = poller.spawn();
        connector.wait_for_requests(3).await;
        handle.stop().await;

        assert!(stream.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_registered_event_reaches_handler_and_stream() {
        let connector = ScriptedConnector::new();
        connector.push_result(json!(["mail", ["ON"]]));
        let registry = HandlerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        registry.register("mail", move |_: &Event| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let (poller, mut stream) = poller(&connector, &registry).with_stream(4);

        let handle = poller.spawn();
        let event = stream.next_event().await.unwrap();
        handle.stop().await;

        assert_eq!(event, Event::new("mail", vec!["ON".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unread_stream_does_not_stall_handlers() {
        let connector = ScriptedConnector::new();
        for _ in 0..6 {
            connector.push_result(json!(["mail", ["ON"]]));
        }
        let registry = HandlerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        registry.register("mail", move |_: &Event| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let (poller, mut stream) = poller(&connector, &registry).with_stream(2);

        let handle = poller.spawn();
        connector.wait_for_requests(7).await;
        handle.stop().await;

        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(connector.remaining(), 0);
        // Only the buffered events reach the stream
        assert!(stream.next_event().await.is_some());
        assert!(stream.next_event().await.is_some());
        assert!(stream.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_event_is_retried_after_backoff() {
        let connector = ScriptedConnector::new();
        connector.push_result(json!({"event": "mail"}));
        let registry = HandlerRegistry::new();

        let handle = poller(&connector, &registry).spawn();
        connector.wait_for_requests(2).await;
        handle.stop().await;

        let requests = connector.requests();
        assert_eq!(requests[1].at - requests[0].at, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_transitions() {
        let connector = ScriptedConnector::new();
        connector.push_failure(ClientError::network("refused"));
        let registry = HandlerRegistry::new();

        let handle = poller(&connector, &registry).spawn();
        let mut states = handle.watch_state();
        states
            .wait_for(|state| *state == PollerState::Waiting)
            .await
            .unwrap();
        assert!(handle.is_running());

        let mut after_stop = handle.watch_state();
        handle.stop().await;
        assert_eq!(*after_stop.borrow_and_update(), PollerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_loop() {
        let connector = ScriptedConnector::new();
        let registry = HandlerRegistry::new();

        let handle = poller(&connector, &registry).spawn();
        let mut states = handle.watch_state();
        connector.wait_for_requests(1).await;
        drop(handle);

        states
            .wait_for(|state| *state == PollerState::Stopped)
            .await
            .unwrap();
    }
}
