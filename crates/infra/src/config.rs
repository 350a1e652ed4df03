//! Configuration loading and representation.
//!
//! Settings come from an optional file (`config/order_list.*`, or the path
//! in `ORDER_LIST_CONFIG`) overlaid by `ORDER_LIST__*` environment variables.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use orderlist_orders::{DEFAULT_VIEW_SIZE, FilterGroupSource};

pub const CONFIG_PATH_ENV: &str = "ORDER_LIST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/order_list";
const ENV_PREFIX: &str = "ORDER_LIST";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderListSettings {
    /// Page size of a freshly created order list state.
    #[serde(default = "default_view_size")]
    pub view_size: u32,

    /// Deadline for the cursor reads of one fetch.
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,

    /// Postgres connection string; absent means the in-memory order store.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Decide filter-group membership from the type selections (legacy).
    #[serde(default)]
    pub legacy_filter_group: bool,

    /// Order list states untouched for this long are discarded.
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,
}

fn default_view_size() -> u32 {
    DEFAULT_VIEW_SIZE.get()
}

fn default_session_idle_timeout_secs() -> u64 {
    30 * 60
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for OrderListSettings {
    fn default() -> Self {
        Self {
            view_size: default_view_size(),
            query_timeout_ms: None,
            database_url: None,
            bind_addr: default_bind_addr(),
            legacy_filter_group: false,
            session_idle_timeout_secs: default_session_idle_timeout_secs(),
        }
    }
}

impl OrderListSettings {
    /// Load from the optional settings file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.view_size == 0 {
            return Err(ConfigError::Invalid("view_size must be greater than 0".to_string()));
        }
        if self.session_idle_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "session_idle_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.query_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "query_timeout_ms must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_view_size(&self) -> NonZeroU32 {
        NonZeroU32::new(self.view_size).unwrap_or(DEFAULT_VIEW_SIZE)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn filter_group_source(&self) -> FilterGroupSource {
        if self.legacy_filter_group {
            FilterGroupSource::Types
        } else {
            FilterGroupSource::Filters
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn empty_sources_yield_defaults() {
        let settings = OrderListSettings::from_config(Config::builder().build().unwrap()).unwrap();
        assert_eq!(settings, OrderListSettings::default());
        assert_eq!(settings.default_view_size().get(), 10);
        assert_eq!(settings.query_timeout(), None);
        assert_eq!(settings.session_idle_timeout(), Duration::from_secs(1800));
        assert_eq!(settings.filter_group_source(), FilterGroupSource::Filters);
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            view_size = 25
            query_timeout_ms = 1500
            database_url = "postgres://localhost/orders"
            legacy_filter_group = true
            session_idle_timeout_secs = 300
        "#;
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();

        let settings = OrderListSettings::from_config(config).unwrap();
        assert_eq!(settings.default_view_size().get(), 25);
        assert_eq!(settings.query_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/orders"));
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.filter_group_source(), FilterGroupSource::Types);
        assert_eq!(settings.session_idle_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn zero_view_size_is_rejected() {
        let config = Config::builder()
            .set_override("view_size", 0)
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            OrderListSettings::from_config(config),
            Err(ConfigError::Invalid(msg)) if msg.contains("view_size")
        ));
    }

    #[test]
    fn zero_session_idle_timeout_is_rejected() {
        let config = Config::builder()
            .set_override("session_idle_timeout_secs", 0)
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            OrderListSettings::from_config(config),
            Err(ConfigError::Invalid(msg)) if msg.contains("session_idle_timeout_secs")
        ));
    }
}
