//! TOML configuration for the `pph21` binary.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [logging]
//! level = "debug"          # any EnvFilter directive; RUST_LOG still wins
//! file = "pph21.log"       # appended to; directory must exist
//!
//! [ptkp]
//! base = 54000000
//! married_addition = 4500000
//! per_dependent = 4500000
//!
//! [labels]
//! a = "Suami"
//! b = "Istri"
//! ```

use std::path::{Path, PathBuf};

use pph_core::PtkpTable;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Names shown for the two household members in reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub a: String,
    pub b: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            a: "Suami".to_string(),
            b: "Istri".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub ptkp: PtkpTable,
    pub labels: Labels,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Applies command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        level: Option<String>,
        file: Option<PathBuf>,
    ) -> Self {
        if level.is_some() {
            self.logging.level = level;
        }
        if file.is_some() {
            self.logging.file = file;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ptkp.base, dec!(54000000));
        assert_eq!(config.labels.a, "Suami");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [ptkp]
            base = 60000000

            [labels]
            b = "Wife"
            "#,
        )
        .unwrap();

        assert_eq!(config.ptkp.base, dec!(60000000));
        assert_eq!(config.ptkp.married_addition, dec!(4500000));
        assert_eq!(config.labels.a, "Suami");
        assert_eq!(config.labels.b, "Wife");
    }

    #[test]
    fn logging_section_is_read() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            level = "debug"
            file = "pph21.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("pph21.log")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = AppConfig::from_toml_str("[schedule]\nrate = 1\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = AppConfig::default()
            .with_overrides(Some("trace".to_string()), None)
            .with_overrides(None, Some(PathBuf::from("out.log")));

        assert_eq!(config.logging.level.as_deref(), Some("trace"));
        assert_eq!(config.logging.file, Some(PathBuf::from("out.log")));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = AppConfig::load(Path::new("/this/path/does/not/exist.toml"));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
