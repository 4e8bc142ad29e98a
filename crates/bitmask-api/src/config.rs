//! Client configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ClientError;

/// Default backend API root (the `/API` prefix served by the local backend).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7070/API";

/// Default delay before re-polling after a failed event poll.
pub const DEFAULT_POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Default number of events buffered for a stream consumer.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Configuration for a [`BitmaskClient`](crate::BitmaskClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API root; commands are posted to `<base_url>/<namespace>/<verb>`
    pub base_url: String,

    /// Timeout applied to ordinary command calls
    pub request_timeout: Duration,

    /// Timeout for establishing the TCP connection
    pub connect_timeout: Duration,

    /// Timeout applied to the long-poll `events/poll` request
    pub poll_timeout: Duration,

    /// Fixed delay between a failed poll and the next attempt
    pub poll_backoff: Duration,

    /// Capacity of the event stream channel
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(60),
            poll_backoff: DEFAULT_POLL_BACKOFF,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BITMASK_API_URL`: API root (default: http://127.0.0.1:7070/API)
    /// - `BITMASK_REQUEST_TIMEOUT_MS`: command timeout (default: 10000)
    /// - `BITMASK_CONNECT_TIMEOUT_MS`: connect timeout (default: 2000)
    /// - `BITMASK_POLL_TIMEOUT_MS`: long-poll timeout (default: 60000)
    /// - `BITMASK_POLL_BACKOFF_MS`: delay after a failed poll (default: 5000)
    /// - `BITMASK_EVENT_BUFFER`: event stream capacity (default: 64)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("BITMASK_API_URL").unwrap_or(defaults.base_url),
            request_timeout: env_millis("BITMASK_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout),
            connect_timeout: env_millis("BITMASK_CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.connect_timeout),
            poll_timeout: env_millis("BITMASK_POLL_TIMEOUT_MS").unwrap_or(defaults.poll_timeout),
            poll_backoff: env_millis("BITMASK_POLL_BACKOFF_MS").unwrap_or(defaults.poll_backoff),
            event_buffer: env::var("BITMASK_EVENT_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.event_buffer),
        }
    }

    /// Replace the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the poll backoff.
    #[must_use]
    pub fn with_poll_backoff(mut self, backoff: Duration) -> Self {
        self.poll_backoff = backoff;
        self
    }

    /// Check that the configuration can drive a client.
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "base URL must use http or https: {}",
                self.base_url
            )));
        }
        let timings = [
            ("request timeout", self.request_timeout),
            ("connect timeout", self.connect_timeout),
            ("poll timeout", self.poll_timeout),
            ("poll backoff", self.poll_backoff),
        ];
        for (name, value) in timings {
            if value.is_zero() {
                return Err(ClientError::Configuration(format!("{name} must be non-zero")));
            }
        }
        if self.event_buffer == 0 {
            return Err(ClientError::Configuration(
                "event buffer must hold at least one event".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:7070/API");
        assert_eq!(config.poll_backoff, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ClientConfig::default().with_base_url("unix:///run/bitmask.sock");
        assert!(matches!(
            config.validate(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_backoff() {
        let config = ClientConfig::default().with_poll_backoff(Duration::ZERO);
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("poll backoff"));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let config = ClientConfig {
            event_buffer: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
