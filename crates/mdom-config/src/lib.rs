//! Configuration management for mdom.
//!
//! Parses `mdom.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [parse]
//! gfm = true
//!
//! [render]
//! sanitize = true
//! key_prefix = "h"
//! max_depth = 512
//!
//! [hypertext]
//! allow_dangerous_html = false
//!
//! # Extends the default sanitization schema.
//! [sanitize]
//! allow_tags = ["section"]
//! allow_attributes = { code = ["class"] }
//! ```
//!
//! `render.key_prefix` supports environment variable expansion
//! (`${VAR}` and `${VAR:-default}`).

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mdom_render::{
    DEFAULT_KEY_PREFIX, DEFAULT_MAX_DEPTH, HypertextOptions, ParseOptions, RenderOptions,
    Sanitize, Schema,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the sanitize flag.
    pub sanitize: Option<bool>,
    /// Override raw HTML pass-through.
    pub allow_dangerous_html: Option<bool>,
    /// Override the key prefix.
    pub key_prefix: Option<String>,
    /// Override GitHub Flavored Markdown parsing.
    pub gfm: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdom.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parsing options.
    pub parse: ParseOptions,
    /// Renderer settings.
    pub render: RenderConfig,
    /// Syntax-to-hypertext conversion options.
    pub hypertext: HypertextOptions,
    /// Additions to the default sanitization schema.
    pub sanitize: SanitizeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Renderer settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether the hypertext tree is sanitized before rendering.
    pub sanitize: bool,
    /// Prefix of every reconciliation key.
    pub key_prefix: String,
    /// Maximum tree depth below the root.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sanitize: true,
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Tags and attributes allowed in addition to the default schema.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Extra tag names.
    pub allow_tags: Vec<String>,
    /// Extra attributes per tag name (`*` for every tag).
    pub allow_attributes: BTreeMap<String, Vec<String>>,
}

impl SanitizeConfig {
    /// Whether the section adds nothing to the default schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allow_tags.is_empty() && self.allow_attributes.values().all(Vec::is_empty)
    }

    /// Default schema extended with the configured tags and attributes.
    #[must_use]
    pub fn schema(&self) -> Schema {
        let schema = self
            .allow_tags
            .iter()
            .fold(Schema::default(), |schema, tag| schema.allow_tag(tag));
        self.allow_attributes
            .iter()
            .flat_map(|(tag, attributes)| attributes.iter().map(move |attr| (tag, attr)))
            .fold(schema, |schema, (tag, attr)| schema.allow_attribute(tag, attr))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.key_prefix`").
        field: String,
        /// Error message (e.g., "${`DOC_PREFIX`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdom.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(sanitize) = settings.sanitize {
            self.render.sanitize = sanitize;
        }
        if let Some(allow) = settings.allow_dangerous_html {
            self.hypertext.allow_dangerous_html = allow;
        }
        if let Some(prefix) = &settings.key_prefix {
            self.render.key_prefix.clone_from(prefix);
        }
        if let Some(gfm) = settings.gfm {
            self.parse.gfm = gfm;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_config_from(&cwd)
    }

    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.key_prefix, "render.key_prefix")?;
        if self.render.max_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }
        for tag in &self.sanitize.allow_tags {
            require_non_empty(tag, "sanitize.allow_tags")?;
        }
        for (tag, attributes) in &self.sanitize.allow_attributes {
            require_non_empty(tag, "sanitize.allow_attributes")?;
            for attribute in attributes {
                require_non_empty(attribute, &format!("sanitize.allow_attributes.{tag}"))?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.key_prefix = expand::expand_env(&self.render.key_prefix, "render.key_prefix")?;
        Ok(())
    }

    /// Sanitization as configured.
    #[must_use]
    pub fn sanitize(&self) -> Sanitize {
        if !self.render.sanitize {
            if !self.sanitize.is_empty() {
                tracing::warn!("[sanitize] section ignored because render.sanitize is false");
            }
            return Sanitize::Disabled;
        }
        if self.sanitize.is_empty() {
            Sanitize::Enabled
        } else {
            Sanitize::from(self.sanitize.schema())
        }
    }

    /// Render options built from this configuration.
    ///
    /// Component overrides and the element factory are code-level concerns
    /// and keep their defaults.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_sanitize(self.sanitize())
            .with_hypertext(self.hypertext.clone())
            .with_parse(self.parse.clone())
            .with_key_prefix(&self.render.key_prefix)
            .with_max_depth(self.render.max_depth)
    }
}
