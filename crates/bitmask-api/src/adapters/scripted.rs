//! In-memory connector that replays scripted replies.
//!
//! Test support, compiled only with the `test-util` feature. Replies are
//! consumed in order, every request is recorded with the (tokio) instant it
//! was issued, and callers can wait until a given number of requests has been
//! seen.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::domain::Route;
use crate::error::ClientError;
use crate::ports::{BackendConnector, WireReply};

/// A request observed by a [`ScriptedConnector`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub route: Route,
    pub body: String,
    pub at: Instant,
}

#[derive(Default)]
struct ScriptState {
    replies: Mutex<VecDeque<Result<WireReply, ClientError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    seen: Notify,
}

/// Replays queued replies, one per request.
///
/// Once the script runs dry every request fails with a network error.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    state: Arc<ScriptState>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply.
    pub fn push_reply(&self, reply: WireReply) -> &Self {
        self.state.replies.lock().push_back(Ok(reply));
        self
    }

    /// Queue a `200 OK` reply with the given JSON body.
    pub fn push_json(&self, body: Value) -> &Self {
        self.push_reply(WireReply::ok(body.to_string()))
    }

    /// Queue a successful envelope carrying `result`.
    pub fn push_result(&self, result: Value) -> &Self {
        self.push_json(serde_json::json!({ "result": result, "error": null }))
    }

    /// Queue an envelope reporting a backend error.
    pub fn push_error(&self, message: &str) -> &Self {
        self.push_json(serde_json::json!({ "result": null, "error": message }))
    }

    /// Queue the "no event yet" poll reply.
    pub fn push_empty(&self) -> &Self {
        self.push_json(serde_json::json!({ "result": null, "error": null }))
    }

    /// Queue a connection-level failure.
    pub fn push_failure(&self, error: ClientError) -> &Self {
        self.state.replies.lock().push_back(Err(error));
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Scripted replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.state.replies.lock().len()
    }

    /// Wait until at least `count` requests have been issued.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.request_count() < count {
            self.state.seen.notified().await;
        }
    }
}

#[async_trait]
impl BackendConnector for ScriptedConnector {
    async fn post(&self, route: Route, body: String) -> Result<WireReply, ClientError> {
        self.state.requests.lock().push(RecordedRequest {
            route,
            body,
            at: Instant::now(),
        });
        let reply = self
            .state
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("script exhausted")));
        self.state.seen.notify_one();
        reply
    }
}
