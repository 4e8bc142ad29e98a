//! HTTP connector for the local backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::trace;

use crate::config::ClientConfig;
use crate::domain::Route;
use crate::error::ClientError;
use crate::ports::{BackendConnector, WireReply};

/// Posts commands to `<base_url>/<namespace>/<verb>` with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    poll_timeout: Duration,
}

impl HttpConnector {
    /// Create a connector from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ClientError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
            poll_timeout: config.poll_timeout,
        })
    }

    /// Full URL for a route.
    pub fn endpoint(&self, route: Route) -> String {
        format!("{}/{}/{}", self.base_url, route.namespace, route.verb)
    }

    fn timeout_for(&self, route: Route) -> Duration {
        if route == Route::EVENTS_POLL {
            self.poll_timeout
        } else {
            self.request_timeout
        }
    }
}

#[async_trait]
impl BackendConnector for HttpConnector {
    async fn post(&self, route: Route, body: String) -> Result<WireReply, ClientError> {
        let url = self.endpoint(route);
        trace!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout_for(route))
            .body(body)
            .send()
            .await
            .map_err(ClientError::network)?;

        let status = response.status();
        let status_text = status
            .canonical_reason()
            .map_or_else(|| status.as_str().to_string(), str::to_string);
        let body = response.text().await.map_err(ClientError::network)?;

        Ok(WireReply {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_route() {
        let config = ClientConfig::default().with_base_url("http://localhost:7070/API/");
        let connector = HttpConnector::new(&config).unwrap();
        assert_eq!(
            connector.endpoint(Route::USER_AUTHENTICATE),
            "http://localhost:7070/API/user/authenticate"
        );
        assert_eq!(
            connector.endpoint(Route::MAIL_GET_TOKEN),
            "http://localhost:7070/API/mail/get-token"
        );
    }

    #[test]
    fn test_poll_uses_long_timeout() {
        let connector = HttpConnector::new(&ClientConfig::default()).unwrap();
        assert_eq!(connector.timeout_for(Route::EVENTS_POLL), Duration::from_secs(60));
        assert_eq!(connector.timeout_for(Route::KEYS_LIST), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ClientConfig::default().with_base_url("localhost:7070");
        assert!(matches!(
            HttpConnector::new(&config),
            Err(ClientError::Configuration(_))
        ));
    }
}
