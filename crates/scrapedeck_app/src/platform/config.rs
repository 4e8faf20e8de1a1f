//! Optional RON config file for the terminal app.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use scrapedeck_client::ApiSettings;
use scrapedeck_core::search::{SearchSettings, StreamErrorPolicy};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "scrapedeck.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_failures: u32,
    pub stream_error_policy: StreamErrorPolicy,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let search = SearchSettings::default();
        Self {
            base_url: api.base_url,
            poll_interval_ms: search.poll_interval.as_millis() as u64,
            max_poll_failures: search.max_poll_failures,
            stream_error_policy: search.stream_error_policy,
            connect_timeout_ms: api.connect_timeout.as_millis() as u64,
            request_timeout_ms: api.request_timeout.as_millis() as u64,
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    /// A zero timeout would fail every request at once, so it means "use
    /// the default" instead.
    pub fn api_settings(&self) -> ApiSettings {
        let defaults = ApiSettings::default();
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: timeout_or(self.connect_timeout_ms, defaults.connect_timeout),
            request_timeout: timeout_or(self.request_timeout_ms, defaults.request_timeout),
            ..defaults
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            // A zero period would spin the poller.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_poll_failures: self.max_poll_failures.max(1),
            stream_error_policy: self.stream_error_policy,
        }
    }
}

fn timeout_or(millis: u64, default: Duration) -> Duration {
    if millis == 0 {
        default
    } else {
        Duration::from_millis(millis)
    }
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
