//! Strategy trait and core types
//!
//! Provides the [`Strategy`] trait: a named, pure transformation over the
//! method datasets under import.

use crate::dataset::MethodDataset;
use lcia_store::StoreError;
use std::fmt;

/// Transformation applied to method datasets during import
///
/// Strategies take ownership of the datasets and return them transformed.
/// They must not reorder datasets or exchanges.
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Strategy name (for logging and the applied-strategies record)
    fn name(&self) -> &str;

    /// Transform the datasets
    ///
    /// # Errors
    /// Any failure aborts the import.
    fn apply(&self, data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError>;
}

/// Strategy failure
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Link candidates are not unique by the link fields
    #[error("{count} link candidates share {fields} = {values}")]
    AmbiguousCandidates {
        /// Link field names
        fields: String,
        /// Shared field values
        values: String,
        /// Number of candidates sharing them
        count: usize,
    },

    /// Link fields list is empty
    #[error("no link fields given")]
    NoLinkFields,

    /// Candidate nodes could not be read
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Strategy-specific error
    #[error("strategy '{strategy}' failed: {message}")]
    Failed {
        /// Strategy name
        strategy: String,
        /// Failure description
        message: String,
    },
}

impl StrategyError {
    /// Create strategy-specific failure
    #[inline]
    pub fn failed(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}

/// Strategy defined by a closure
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> + Send + Sync,
{
    /// Wrap a closure as a named strategy
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").field("name", &self.name).finish()
    }
}

impl<F> Strategy for FnStrategy<F>
where
    F: Fn(Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> {
        (self.f)(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_strategy_applies_closure() {
        let strategy = FnStrategy::new("drop_all", |_data| Ok(Vec::new()));
        assert_eq!(strategy.name(), "drop_all");
        assert!(strategy.apply(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn failed_display() {
        let err = StrategyError::failed("normalize_units", "bad unit");
        assert_eq!(err.to_string(), "strategy 'normalize_units' failed: bad unit");
    }
}
