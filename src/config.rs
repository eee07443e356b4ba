//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and their environment variables.
//!
//! ```yaml
//! api_base: https://router.huggingface.co/hf-inference/models
//! summarization_model: sshleifer/distilbart-cnn-12-6
//! sentiment_model: distilbert/distilbert-base-uncased-finetuned-sst-2-english
//! preloaded:
//!   - title: BBC Article 1
//!     url: https://www.bbc.com/news/world-us-canada-66801985
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::extractor::validate_url;
use crate::models::{ArticleSource, preloaded_articles};
use serde::Deserialize;
use tracing::{info, instrument};

pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
pub const DEFAULT_SENTIMENT_MODEL: &str =
    "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_base: String,
    pub api_token: Option<String>,
    pub summarization_model: String,
    pub sentiment_model: String,
    pub user_agent: String,
    pub preloaded: Vec<ArticleSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            user_agent: concat!(
                "Mozilla/5.0 (compatible; news_pulse/",
                env!("CARGO_PKG_VERSION"),
                ")"
            )
            .to_string(),
            preloaded: preloaded_articles(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Flags and environment variables win over the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base) = &cli.api_base {
            self.api_base = base.clone();
        }
        if let Some(token) = &cli.api_token {
            self.api_token = Some(token.clone());
        }
        if let Some(model) = &cli.summarization_model {
            self.summarization_model = model.clone();
        }
        if let Some(model) = &cli.sentiment_model {
            self.sentiment_model = model.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.api_base)
            .map_err(|e| ConfigError::Invalid(format!("api_base: {e}")))?;
        if self.summarization_model.trim().is_empty() {
            return Err(ConfigError::Invalid("summarization_model is empty".into()));
        }
        if self.sentiment_model.trim().is_empty() {
            return Err(ConfigError::Invalid("sentiment_model is empty".into()));
        }
        if self.preloaded.is_empty() {
            return Err(ConfigError::Invalid("preloaded list is empty".into()));
        }
        for source in &self.preloaded {
            validate_url(&source.url)
                .map_err(|e| ConfigError::Invalid(format!("preloaded `{}`: {e}", source.title)))?;
        }
        Ok(())
    }
}

/// Load a YAML config file.
#[instrument(level = "info", skip_all, fields(%path))]
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config = AppConfig::from_yaml(&yaml, path)?;
    info!(preloaded = config.preloaded.len(), "Loaded configuration");
    Ok(config)
}

/// Build the effective configuration for this run.
pub fn resolve(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let base = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let config = base.with_overrides(cli);
    config.validate()?;
    Ok(config)
}
