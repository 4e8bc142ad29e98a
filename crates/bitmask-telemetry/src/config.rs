//! Logging configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Name reported in the startup line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or `target=level` lists)
    pub log_level: String,

    /// Whether to emit JSON lines instead of human readable output
    pub json_logs: bool,

    /// Whether to colour human readable output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "bitmask".to_string(),
            log_level: "warn".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BITMASK_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: warn)
    /// - `BITMASK_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `NO_COLOR`: Disable ANSI colours when set
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: defaults.service_name,

            log_level: env::var("BITMASK_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: env::var("BITMASK_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            ansi: env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Configuration for a named tool.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }

    /// Raise the filter to at least `debug` for every target.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "bitmask");
        assert_eq!(config.log_level, "warn");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_for_service() {
        let config = TelemetryConfig::for_service("bitmask-cli");
        assert_eq!(config.service_name, "bitmask-cli");
    }

    #[test]
    fn test_verbose_overrides_level() {
        let config = TelemetryConfig::default().verbose(true);
        assert_eq!(config.log_level, "debug");

        let untouched = TelemetryConfig::default().verbose(false);
        assert_eq!(untouched.log_level, "warn");
    }
}
