//! Layered runtime settings.
//!
//! Sources are applied lowest to highest: built-in defaults, an optional
//! config file, `ANOMALY_DASH_*` environment variables, then command-line
//! flags.
//!
//! ```toml
//! base_url = "http://sensors.local:5000"
//! interval_ms = 2000
//! flag_policy = "strict"
//! theme = "dark"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;

use crate::data::FlagPolicy;
use crate::poller::{PollSettings, DEFAULT_INTERVAL};
use crate::source::{
    HttpBackend, SourceError, DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DEFAULT_METRICS_PATH,
    DEFAULT_TIMEOUT,
};
use crate::ui::theme::ThemeMode;

const ENV_PREFIX: &str = "ANOMALY_DASH";
const DEFAULT_LOG_FILE: &str = "anomaly-dash.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub data_path: String,
    pub metrics_path: String,
    pub interval_ms: u64,
    pub timeout_ms: u64,
    pub flag_policy: FlagPolicy,
    pub theme: ThemeMode,
    pub log_file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

/// Values given on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub flag_policy: Option<FlagPolicy>,
    pub theme: Option<ThemeMode>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from every layer, reading the process environment.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        Self::load_from(file, None, overrides)
    }

    /// Like [`Settings::load`], but with `env` standing in for the process
    /// environment when given.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("data_path", DEFAULT_DATA_PATH)?
            .set_default("metrics_path", DEFAULT_METRICS_PATH)?
            .set_default("interval_ms", DEFAULT_INTERVAL.as_millis() as u64)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT.as_millis() as u64)?
            .set_default("flag_policy", FlagPolicy::default().label())?
            .set_default("theme", ThemeMode::default().to_string())?
            .set_default("log_file", DEFAULT_LOG_FILE)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(env))
            .set_override_option("base_url", overrides.base_url)?
            .set_override_option("interval_ms", overrides.interval_ms)?
            .set_override_option("timeout_ms", overrides.timeout_ms)?
            .set_override_option("flag_policy", overrides.flag_policy.map(|p| p.label()))?
            .set_override_option("theme", overrides.theme.map(|t| t.to_string()))?
            .set_override_option(
                "log_file",
                overrides.log_file.map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Message("interval_ms must be greater than zero".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Message("timeout_ms must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.interval_ms),
            flag_policy: self.flag_policy,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the HTTP backend these settings describe.
    pub fn backend(&self) -> Result<HttpBackend, SourceError> {
        HttpBackend::builder()
            .base_url(self.base_url.as_str())
            .data_path(self.data_path.as_str())
            .metrics_path(self.metrics_path.as_str())
            .timeout(self.request_timeout())
            .build()
    }
}
