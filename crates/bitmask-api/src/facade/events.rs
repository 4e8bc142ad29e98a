//! Event registration.
//!
//! Registrations take effect locally first. The matching backend call is
//! advisory: it tells the backend which events to queue, but delivery is
//! always filtered by the local registry, so a failed backend call leaves
//! the local change in place and only reports the error.

use crate::dispatcher::Dispatcher;
use crate::domain::Command;
use crate::error::ClientError;
use crate::events::{EventHandler, HandlerRegistry};
use crate::ports::BackendConnector;

/// `events/register` and `events/unregister`, bound to a session registry.
pub struct EventsApi<C> {
    dispatcher: Dispatcher<C>,
    registry: HandlerRegistry,
}

impl<C> Clone for EventsApi<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<C: BackendConnector> EventsApi<C> {
    pub fn new(dispatcher: Dispatcher<C>, registry: HandlerRegistry) -> Self {
        Self {
            dispatcher,
            registry,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Call `handler` for every `name` event, replacing any previous handler.
    pub async fn register<H>(&self, name: &str, handler: H) -> Result<(), ClientError>
    where
        H: EventHandler + 'static,
    {
        self.registry.register(name, handler);
        self.advise(Command::EventsRegister {
            event: name.to_string(),
        })
        .await
    }

    /// Accept `name` events for the event stream, without a callback.
    pub async fn subscribe(&self, name: &str) -> Result<(), ClientError> {
        self.registry.subscribe(name);
        self.advise(Command::EventsRegister {
            event: name.to_string(),
        })
        .await
    }

    /// Stop delivering `name` events.
    pub async fn unregister(&self, name: &str) -> Result<(), ClientError> {
        self.registry.unregister(name);
        self.advise(Command::EventsUnregister {
            event: name.to_string(),
        })
        .await
    }

    async fn advise(&self, command: Command) -> Result<(), ClientError> {
        self.dispatcher.dispatch(command).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedConnector;
    use crate::domain::{Event, Route};
    use serde_json::json;

    fn api() -> (EventsApi<ScriptedConnector>, ScriptedConnector) {
        let connector = ScriptedConnector::new();
        let api = EventsApi::new(Dispatcher::new(connector.clone()), HandlerRegistry::new());
        (api, connector)
    }

    #[tokio::test]
    async fn test_register_is_local_and_advised() {
        let (api, connector) = api();
        connector.push_result(json!("ok"));

        api.register("mail", |_: &Event| {}).await.unwrap();
        assert!(api.registry().is_registered("mail"));

        let request = &connector.requests()[0];
        assert_eq!(request.route, Route::EVENTS_REGISTER);
        assert_eq!(request.body, r#"["mail"]"#);
    }

    #[tokio::test]
    async fn test_failed_advice_keeps_local_registration() {
        let (api, connector) = api();
        connector.push_failure(ClientError::network("refused"));

        assert!(api.subscribe("mail").await.is_err());
        assert!(api.registry().is_registered("mail"));
    }

    #[tokio::test]
    async fn test_unregister_removes_locally() {
        let (api, connector) = api();
        connector.push_result(json!("ok")).push_result(json!("ok"));

        api.subscribe("mail").await.unwrap();
        api.unregister("mail").await.unwrap();
        assert!(!api.registry().is_registered("mail"));
        assert_eq!(connector.requests()[1].route, Route::EVENTS_UNREGISTER);
    }
}
