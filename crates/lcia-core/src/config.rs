//! Importer configuration
//!
//! Defaults reproduce the plain import: no overwrite, sequential
//! reconciliation, link by name and categories, report `errors_custom_lcia`
//! in the working directory. Values can be loaded from TOML:
//!
//! ```toml
//! overwrite = false
//! report_dir = "reports"
//! link_fields = ["name", "categories"]
//!
//! [reconcile]
//! mode = "parallel"
//! workers = 4
//! ```

use lcia_strategy::LinkField;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default error report name
pub const DEFAULT_REPORT_NAME: &str = "errors_custom_lcia";

/// How flow keys are reconciled against the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReconcileMode {
    /// One key after another
    #[default]
    Sequential,
    /// Keys spread over a worker pool
    Parallel {
        /// Worker threads
        workers: usize,
    },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Import configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImporterConfig {
    /// Replace stored methods with the same identity
    pub overwrite: bool,
    /// Directory for the error report
    pub report_dir: PathBuf,
    /// Error report name, without extension
    pub report_name: String,
    /// Reconciliation mode
    pub reconcile: ReconcileMode,
    /// Drop unlinked CFs once the error report is written
    pub drop_unlinked: bool,
    /// Fields used to link CFs to nodes
    pub link_fields: Vec<LinkField>,
    /// Re-link CFs that already carry a node
    pub relink: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            report_dir: PathBuf::from("."),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            reconcile: ReconcileMode::Sequential,
            drop_unlinked: false,
            link_fields: LinkField::DEFAULT.to_vec(),
            relink: false,
        }
    }
}

impl ImporterConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With overwrite flag
    #[inline]
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// With report directory
    #[inline]
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// With reconciliation mode
    #[inline]
    #[must_use]
    pub fn with_reconcile(mut self, mode: ReconcileMode) -> Self {
        self.reconcile = mode;
        self
    }

    /// With drop-unlinked flag
    #[inline]
    #[must_use]
    pub fn with_drop_unlinked(mut self, drop_unlinked: bool) -> Self {
        self.drop_unlinked = drop_unlinked;
        self
    }

    /// With link fields
    #[inline]
    #[must_use]
    pub fn with_link_fields(mut self, fields: Vec<LinkField>) -> Self {
        self.link_fields = fields;
        self
    }

    /// With relink flag
    #[inline]
    #[must_use]
    pub fn with_relink(mut self, relink: bool) -> Self {
        self.relink = relink;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Parse errors and out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// IO errors, parse errors and out-of-range values.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ReconcileMode::Parallel { workers: 0 } = self.reconcile {
            return Err(ConfigError::Invalid("parallel reconcile needs at least one worker".to_string()));
        }
        if self.link_fields.is_empty() {
            return Err(ConfigError::Invalid("link_fields is empty".to_string()));
        }
        if self.report_name.trim().is_empty() {
            return Err(ConfigError::Invalid("report_name is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ImporterConfig::new();
        assert!(!config.overwrite);
        assert_eq!(config.report_name, "errors_custom_lcia");
        assert_eq!(config.link_fields, vec![LinkField::Name, LinkField::Categories]);
        assert_eq!(config.reconcile, ReconcileMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let config = ImporterConfig::from_toml_str(
            r#"
            overwrite = true
            report_dir = "reports"

            [reconcile]
            mode = "parallel"
            workers = 4
            "#,
        )
        .unwrap();

        assert!(config.overwrite);
        assert_eq!(config.report_dir, PathBuf::from("reports"));
        assert_eq!(config.reconcile, ReconcileMode::Parallel { workers: 4 });
        assert_eq!(config.report_name, DEFAULT_REPORT_NAME);
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = ImporterConfig::from_toml_str("overwrit = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_workers_rejected() {
        let err = ImporterConfig::from_toml_str(
            r#"
            [reconcile]
            mode = "parallel"
            workers = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn link_fields_from_toml() {
        let config = ImporterConfig::from_toml_str(r#"link_fields = ["name"]"#).unwrap();
        assert_eq!(config.link_fields, vec![LinkField::Name]);
    }

    #[test]
    fn unit_is_not_a_link_field() {
        let err = ImporterConfig::from_toml_str(r#"link_fields = ["name", "unit"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
