//! Layered application configuration.
//!
//! # Load Order
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `fabula/fabula.toml` under the user config
//!    directory when present)
//! 3. Environment variables (`FABULA__SECTION__KEY`)
//! 4. Command-line overrides
//!
//! Each layer overrides the previous.

use crate::ExportConfig;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use fabula_error::{ConfigError, FabulaResult};
use fabula_models::BackendConfig;
use fabula_narrative::{BatchConfig, PipelineConfig};
use fabula_rate_limit::ThrottleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FABULA";

/// Separator between prefix, section and key in environment overrides.
pub const ENV_SEPARATOR: &str = "__";

/// Location of the per-user configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fabula").join("fabula.toml"))
}

/// Complete application configuration.
///
/// # Examples
///
/// ```
/// use fabula::FabulaConfig;
///
/// let config = FabulaConfig::from_toml_str(r#"
///     [backend]
///     model = "llama3.2"
///
///     [batch]
///     topics = ["A machine that secretly writes stories at night."]
/// "#).unwrap();
///
/// assert_eq!(config.backend().model(), "llama3.2");
/// assert_eq!(*config.pipeline().sections(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct FabulaConfig {
    /// Inference backend connection
    #[serde(default)]
    backend: BackendConfig,
    /// Host-load throttling
    #[serde(default)]
    throttle: ThrottleConfig,
    /// Section pipeline settings
    #[serde(default)]
    pipeline: PipelineConfig,
    /// Topics, cooldowns and output locations
    #[serde(default)]
    batch: BatchConfig,
    /// Markdown export metadata
    #[serde(default)]
    export: ExportConfig,
}

/// Command-line values that replace configured ones when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    /// Replaces the topic list when non-empty
    pub topics: Vec<String>,
    /// Section count
    pub sections: Option<usize>,
    /// Model identifier
    pub model: Option<String>,
    /// Stories per topic
    pub runs: Option<usize>,
    /// Switch to the long-form preset, keeping gate and stage options
    pub long_form: bool,
}

impl FabulaConfig {
    /// Loads configuration from defaults, an optional file and the
    /// environment.
    ///
    /// An explicit `path` must exist. Without one, the per-user file is read
    /// if it exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a source cannot be read or the merged
    /// values do not deserialize.
    #[instrument(skip(path), fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> FabulaResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    debug!(path = %path.display(), "Checking user configuration file");
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("batch.topics"),
        );

        Self::from_builder(builder)
    }

    /// Parses configuration from TOML text layered over defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> FabulaResult<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> FabulaResult<Self> {
        let merged = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?;

        let config: Self = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        debug!(
            model = %config.backend.model(),
            sections = *config.pipeline.sections(),
            topics = config.batch.topics().len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, overrides: &RunOverrides) -> Self {
        if overrides.long_form {
            self.pipeline = PipelineConfig::long_form()
                .with_gate(*self.pipeline.gate())
                .with_stage_options(self.pipeline.stage_options().clone());
        }
        if let Some(sections) = overrides.sections {
            self.pipeline = self.pipeline.with_sections(sections);
        }
        if let Some(model) = &overrides.model {
            self.backend = self.backend.with_model(model.as_str());
        }
        if !overrides.topics.is_empty() {
            self.batch = self.batch.with_topics(overrides.topics.clone());
        }
        if let Some(runs) = overrides.runs {
            self.batch = self.batch.with_runs_per_topic(runs);
        }
        self
    }

    /// Checks pipeline and batch settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> FabulaResult<()> {
        self.pipeline.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}
