//! Error types for LCIA import
//!
//! Every variant here is fatal to an import run. Conditions the run
//! survives (unlinked CFs, overwrite conflicts) are not errors; they are
//! reported in [`crate::ImportSummary`].

use crate::config::ConfigError;
use crate::report::ReportError;
use lcia_ingress::IngressError;
use lcia_store::StoreError;
use lcia_strategy::StrategyError;

/// Main import error type
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Workbook unreadable or laid out wrongly
    #[error("workbook error: {0}")]
    Ingress(#[from] IngressError),

    /// Database failure other than a missing node
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    /// Strategy pipeline failed
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),

    /// Error report could not be written
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reconciliation worker pool could not start
    #[error("worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ImportError {
    /// Check if the workbook layout was at fault
    #[inline]
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Ingress(e) if e.is_schema())
    }
}

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;
