use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend project.
    pub url: String,

    /// The project's anonymous api key.
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Fallback feed used when a profile carries no organization link.
    #[serde(default = "default_feed_url")]
    pub default_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_url: default_feed_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_feed_url() -> String {
    "https://jagsync.tamusa.edu/organization/acm/events.rss".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with BUDGETIT__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BUDGETIT").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides, without relying
    /// on config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [backend]
            url = "https://project.supabase.co"
            anon_key = "test-anon-key"

            [feed]
            default_url = "https://jagsync.tamusa.edu/organization/acm/events.rss"

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.backend.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BUDGETIT__BACKEND__URL environment variable must be set".to_string(),
            ));
        }
        if self.backend.anon_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BUDGETIT__BACKEND__ANON_KEY environment variable must be set".to_string(),
            ));
        }
        Ok(())
    }
}
