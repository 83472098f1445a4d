//! Runtime configuration for the task tracker.
//!
//! Configuration is read from a TOML file and then overridden from the
//! environment:
//!
//! - `TASKER_LOG` replaces `log_level`
//! - `TASKER_TEMPLATES` replaces `templates_path`
//!
//! ```toml
//! log_level = "debug"
//! templates_path = "studio_templates.toml"
//! default_asset_template = "feature_animation_character_asset"
//! default_shot_template = "feature_animation_shot"
//! ```

use crate::template::domain::{DEFAULT_ASSET_TEMPLATE, DEFAULT_SHOT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable overriding the log level.
pub const LOG_ENV: &str = "TASKER_LOG";

/// Environment variable overriding the extra template catalog path.
pub const TEMPLATES_ENV: &str = "TASKER_TEMPLATES";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path:?}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: Arc<std::io::Error>,
    },
    /// The configuration is not valid TOML for [`TaskerConfig`].
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Task tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskerConfig {
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: Option<String>,
    /// Extra template catalog merged over the built-in templates.
    pub templates_path: Option<PathBuf>,
    /// Template used for assets created without naming one.
    pub default_asset_template: String,
    /// Template used for shots created without naming one.
    pub default_shot_template: String,
}

impl Default for TaskerConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            templates_path: None,
            default_asset_template: DEFAULT_ASSET_TEMPLATE.to_owned(),
            default_shot_template: DEFAULT_SHOT_TEMPLATE.to_owned(),
        }
    }
}

impl TaskerConfig {
    /// Parses configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read or
    /// [`ConfigError::Parse`] when it is invalid.
    pub fn load_from_path(file: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(file).map_err(|err| ConfigError::Io {
            path: file.to_path_buf(),
            source: Arc::new(err),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Applies `TASKER_LOG` and `TASKER_TEMPLATES` from the process
    /// environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`; empty values are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(level) = non_empty(LOG_ENV) {
            self.log_level = Some(level);
        }
        if let Some(path) = non_empty(TEMPLATES_ENV) {
            self.templates_path = Some(PathBuf::from(path));
        }
        self
    }
}

#[cfg(test)]
#[expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() -> eyre::Result<()> {
        let config = TaskerConfig::from_toml_str("")?;
        assert_eq!(config, TaskerConfig::default());
        assert_eq!(config.default_asset_template, DEFAULT_ASSET_TEMPLATE);
        assert_eq!(config.default_shot_template, DEFAULT_SHOT_TEMPLATE);
        Ok(())
    }

    #[test]
    fn parses_every_key() -> eyre::Result<()> {
        let config = TaskerConfig::from_toml_str(
            r#"
log_level = "debug"
templates_path = "studio.toml"
default_asset_template = "feature_animation_character_asset"
default_shot_template = "feature_animation_shot"
"#,
        )?;

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.templates_path, Some(PathBuf::from("studio.toml")));
        assert_eq!(config.default_shot_template, "feature_animation_shot");
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = TaskerConfig::from_toml_str("colour = \"blue\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    #[case::both_set(&[(LOG_ENV, "trace"), (TEMPLATES_ENV, "/srv/templates.json")], Some("trace"), Some("/srv/templates.json"))]
    #[case::blank_values_ignored(&[(LOG_ENV, "  "), (TEMPLATES_ENV, "")], Some("warn"), None)]
    #[case::unrelated_only(&[("TASKER_OTHER", "x")], Some("warn"), None)]
    fn environment_overrides_file_values(
        #[case] vars: &[(&str, &str)],
        #[case] level: Option<&str>,
        #[case] templates: Option<&str>,
    ) {
        let env: HashMap<&str, &str> = vars.iter().copied().collect();
        let base = TaskerConfig {
            log_level: Some("warn".to_owned()),
            ..TaskerConfig::default()
        };

        let config = base.with_overrides_from(|key| env.get(key).map(|value| (*value).to_owned()));

        assert_eq!(config.log_level.as_deref(), level);
        assert_eq!(config.templates_path, templates.map(PathBuf::from));
    }

    #[test]
    fn missing_file_reports_its_path() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tasker.toml");

        let result = TaskerConfig::load_from_path(&path);

        assert!(matches!(result, Err(ConfigError::Io { path: found, .. }) if found == path));
        Ok(())
    }
}
