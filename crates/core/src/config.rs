//! Agent configuration.
//!
//! [`AgentConfig`] is built once and handed to each service at construction;
//! nothing in the pipeline reads the environment on its own.
//!
//! # Example
//!
//! ```rust
//! use agenda_core::AgentConfig;
//!
//! let config = AgentConfig::builder()
//!     .api_key("test-key")
//!     .model("gemini-2.0-flash-001")
//!     .event_duration_hours(2)
//!     .build();
//! assert_eq!(config.schedule.duration_hours, 2);
//! ```

use std::path::PathBuf;

use crate::auth::default_token_path;
use crate::fetch::FetchConfig;
use crate::generate::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::schedule::ScheduleConfig;

/// Environment variable holding the Gemini API key.
pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable overriding the model.
pub const ENV_MODEL: &str = "AGENDA_MODEL";
/// Environment variable overriding the token file location.
pub const ENV_TOKEN_PATH: &str = "AGENDA_TOKEN_PATH";
/// Environment variable overriding the calendar id.
pub const ENV_CALENDAR_ID: &str = "AGENDA_CALENDAR_ID";
/// Environment variable with the log level.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Configuration for every pipeline service.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Gemini API key (default: empty).
    pub api_key: String,

    /// Model used for both prompts (default: gemini-2.0-flash-001).
    pub model: String,

    /// Base url of the generation API.
    pub generation_base_url: String,

    /// HTTP settings for article and transcript fetches (default: 15 s timeout).
    pub fetch: FetchConfig,

    /// Calendar id, description tag and duration of created events.
    pub schedule: ScheduleConfig,

    /// Location of the OAuth token file.
    pub token_path: PathBuf,

    /// Log level name (default: info).
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            generation_base_url: DEFAULT_BASE_URL.to_string(),
            fetch: FetchConfig::default(),
            schedule: ScheduleConfig::default(),
            token_path: default_token_path(),
            log_level: "info".to_string(),
        }
    }
}

impl AgentConfig {
    /// Creates a new builder for AgentConfig.
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::new()
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset or empty values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = AgentConfigBuilder::new();

        if let Some(key) = get(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            builder = builder.model(model);
        }
        if let Some(path) = get(ENV_TOKEN_PATH) {
            builder = builder.token_path(path);
        }
        if let Some(calendar_id) = get(ENV_CALENDAR_ID) {
            builder = builder.calendar_id(calendar_id);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            builder = builder.log_level(level.to_lowercase());
        }

        builder.build()
    }
}

/// Builder for AgentConfig.
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: AgentConfig::default() }
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.config.api_key = value.into();
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.config.model = value.into();
        self
    }

    pub fn generation_base_url(mut self, value: impl Into<String>) -> Self {
        self.config.generation_base_url = value.into();
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn calendar_id(mut self, value: impl Into<String>) -> Self {
        self.config.schedule.calendar_id = value.into();
        self
    }

    pub fn event_description(mut self, value: impl Into<String>) -> Self {
        self.config.schedule.description = value.into();
        self
    }

    pub fn event_duration_hours(mut self, value: u32) -> Self {
        self.config.schedule.duration_hours = value;
        self
    }

    pub fn token_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.token_path = value.into();
        self
    }

    pub fn log_level(mut self, value: impl Into<String>) -> Self {
        self.config.log_level = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> AgentConfig {
        self.config
    }
}

impl Default for AgentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
