//! Import statistics and the unlinked-CF error report

use chrono::{DateTime, Utc};
use lcia_model::{Categories, MethodKey};
use lcia_strategy::MethodDataset;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Report file extension
pub const REPORT_EXTENSION: &str = "json";

/// Error report failures
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report directory or file unwritable
    #[error("cannot write report {path}: {source}")]
    Io {
        /// Report file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failed
    #[error("cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Counts over the imported methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Methods
    pub methods: usize,
    /// Characterization factors
    pub cfs: usize,
    /// Factors without a linked node
    pub unlinked: usize,
}

impl ImportStats {
    /// Compute over datasets
    #[must_use]
    pub fn from_datasets(data: &[MethodDataset]) -> Self {
        Self {
            methods: data.len(),
            cfs: data.iter().map(|ds| ds.exchanges.len()).sum(),
            unlinked: data.iter().map(MethodDataset::num_unlinked).sum(),
        }
    }

    /// Whether every factor linked
    #[inline]
    #[must_use]
    pub fn all_linked(&self) -> bool {
        self.unlinked == 0
    }
}

/// Method persisted without some of its factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedMethod {
    /// Method identity
    pub method: MethodKey,
    /// Factors not linked
    pub unlinked: usize,
    /// Factors in the source
    pub total: usize,
}

/// One unlinked factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlinkedCf {
    /// Owning method
    pub method: MethodKey,
    /// Flow name
    pub name: String,
    /// Flow categories as stored
    pub categories: Categories,
    /// Factor value
    pub amount: f64,
}

/// Error report listing every unlinked factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Creation time
    pub generated_at: DateTime<Utc>,
    /// Workbook the factors came from
    pub source_file: String,
    /// Unlinked factors, in method then row order
    pub unlinked: Vec<UnlinkedCf>,
}

impl ErrorReport {
    /// Collect unlinked factors from datasets
    #[must_use]
    pub fn from_datasets(source_file: &str, data: &[MethodDataset]) -> Self {
        let unlinked = data
            .iter()
            .flat_map(|ds| {
                ds.unlinked().map(|exc| UnlinkedCf {
                    method: ds.name.clone(),
                    name: exc.name.clone(),
                    categories: exc.categories.clone(),
                    amount: exc.amount,
                })
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            source_file: source_file.to_string(),
            unlinked,
        }
    }

    /// Whether the report lists nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlinked.is_empty()
    }

    /// Write as pretty JSON to `<dir>/<name>.json`
    ///
    /// # Errors
    /// IO and encoding failures.
    pub fn write(&self, dir: &Path, name: &str) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(format!("{name}.{REPORT_EXTENSION}"));
        let body = serde_json::to_vec_pretty(self)?;
        std::fs::write(&path, body).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
