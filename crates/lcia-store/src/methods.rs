//! LCIA method storage contract

use crate::error::StoreResult;
use lcia_model::{Method, MethodKey};
use serde::Serialize;

/// Result of a batch method write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Methods stored that did not exist before
    pub written: Vec<MethodKey>,
    /// Existing methods replaced because overwrite was requested
    pub replaced: Vec<MethodKey>,
    /// Existing methods left untouched because overwrite was not requested
    pub conflicts: Vec<MethodKey>,
}

impl WriteSummary {
    /// Number of methods committed (new and replaced)
    #[inline]
    #[must_use]
    pub fn committed(&self) -> usize {
        self.written.len() + self.replaced.len()
    }

    /// Whether any method was refused
    #[inline]
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Persistent store of LCIA methods
pub trait MethodStore: Send + Sync {
    /// Write methods as one batch
    ///
    /// Identity collisions are decided for the whole batch first: with
    /// `overwrite` they replace the stored method, without it they are
    /// reported in [`WriteSummary::conflicts`] and not written. All other
    /// methods are committed together.
    ///
    /// # Errors
    /// Storage failures; nothing is committed in that case.
    fn write_methods(&self, methods: Vec<Method>, overwrite: bool) -> StoreResult<WriteSummary>;

    /// Stored method by identity
    fn get_method(&self, key: &MethodKey) -> StoreResult<Option<Method>>;

    /// Identities of all stored methods, ordered
    fn method_keys(&self) -> StoreResult<Vec<MethodKey>>;
}
