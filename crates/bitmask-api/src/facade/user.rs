//! User management: who is logged in, account creation, login and logout.

use serde_json::Value;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::domain::account::ActiveUser;
use crate::domain::{Command, Password, Session};
use crate::error::ClientError;
use crate::ports::BackendConnector;

/// `user/*` commands.
pub struct UserApi<C> {
    dispatcher: Dispatcher<C>,
}

impl<C> Clone for UserApi<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: BackendConnector> UserApi<C> {
    pub fn new(dispatcher: Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// Uid of the logged in user, `None` when nobody is.
    pub async fn active(&self) -> Result<Option<String>, ClientError> {
        let active: ActiveUser = self.dispatcher.dispatch_as(Command::UserActive).await?;
        Ok(active.into_uid())
    }

    /// Register a new account on its provider.
    ///
    /// The backend reply is returned untouched; its shape depends on the
    /// provider.
    pub async fn create(
        &self,
        uid: &str,
        password: impl Into<Password>,
    ) -> Result<Value, ClientError> {
        self.dispatcher
            .dispatch(Command::UserCreate {
                uid: uid.to_string(),
                password: password.into(),
            })
            .await
    }

    /// Log in as `uid`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Auth`] when the backend rejects the credentials
    /// - [`ClientError::Protocol`] when the reply carries no session uuid
    /// - transport errors unchanged
    pub async fn authenticate(
        &self,
        uid: &str,
        password: impl Into<Password>,
    ) -> Result<Session, ClientError> {
        let command = Command::UserAuthenticate {
            uid: uid.to_string(),
            password: password.into(),
        };
        let session: Session = self
            .dispatcher
            .dispatch_as(command)
            .await
            .map_err(ClientError::into_auth)?;
        if session.uuid.is_empty() {
            return Err(ClientError::Protocol(
                "login succeeded without a session uuid".to_string(),
            ));
        }
        info!(uid, "User authenticated");
        Ok(session)
    }

    /// Log `uid` out, or the active user when `uid` is `None`.
    pub async fn logout(&self, uid: Option<&str>) -> Result<(), ClientError> {
        self.dispatcher
            .dispatch(Command::UserLogout {
                uid: uid.map(str::to_string),
            })
            .await?;
        info!(uid = uid.unwrap_or("<active>"), "User logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedConnector;
    use serde_json::json;

    fn api() -> (UserApi<ScriptedConnector>, ScriptedConnector) {
        let connector = ScriptedConnector::new();
        (UserApi::new(Dispatcher::new(connector.clone())), connector)
    }

    #[tokio::test]
    async fn test_active_maps_placeholder_to_none() {
        let (api, connector) = api();
        connector
            .push_result(json!({"user": "<none>"}))
            .push_result(json!("alice@example.org"));

        assert_eq!(api.active().await.unwrap(), None);
        assert_eq!(api.active().await.unwrap().as_deref(), Some("alice@example.org"));
    }

    #[tokio::test]
    async fn test_authenticate_sends_credentials() {
        let (api, connector) = api();
        connector.push_result(json!({"uuid": "0123abcd", "srp_token": "deadbeef"}));

        let session = api.authenticate("alice@example.org", "hunter2").await.unwrap();
        assert_eq!(session.uuid, "0123abcd");
        assert_eq!(connector.requests()[0].body, r#"["alice@example.org","hunter2"]"#);
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_auth_errors() {
        let (api, connector) = api();
        connector.push_error("Invalid username or password");

        let error = api.authenticate("alice@example.org", "wrong").await.unwrap_err();
        assert_eq!(
            error,
            ClientError::Auth("Invalid username or password".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_without_uuid_is_protocol_error() {
        let (api, connector) = api();
        connector
            .push_result(json!({"srp_token": "deadbeef"}))
            .push_result(json!({"uuid": ""}));

        for _ in 0..2 {
            let error = api.authenticate("alice@example.org", "pw").await.unwrap_err();
            assert!(matches!(error, ClientError::Protocol(_)));
        }
    }

    #[tokio::test]
    async fn test_network_error_is_not_auth_error() {
        let (api, connector) = api();
        connector.push_failure(ClientError::network("refused"));

        let error = api.authenticate("alice@example.org", "pw").await.unwrap_err();
        assert_eq!(error.to_string(), "Network Error");
    }

    #[tokio::test]
    async fn test_logout_without_uid_sends_empty_string() {
        let (api, connector) = api();
        connector.push_result(json!({"logout": "ok"}));

        api.logout(None).await.unwrap();
        assert_eq!(connector.requests()[0].body, r#"[""]"#);
    }
}
