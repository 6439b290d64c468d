//! Biosphere node reconciliation
//!
//! Guarantees a node exists in the target database for every flow key the
//! workbook references. Existing nodes are never modified; missing ones are
//! created as emissions with the default unit. Re-running over the same keys
//! creates nothing.

use crate::config::ReconcileMode;
use crate::error::ImportResult;
use lcia_model::{FlowKey, FlowNode};
use lcia_store::{Ensured, FlowDatabase, StoreResult};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Keys that had no node and were created
    pub created: Vec<FlowKey>,
    /// Keys whose node was already present
    pub existing: Vec<FlowKey>,
}

impl ReconcileReport {
    /// Number of keys examined
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.existing.len()
    }

    fn record(&mut self, key: FlowKey, ensured: &Ensured) {
        if ensured.created() {
            self.created.push(key);
        } else {
            self.existing.push(key);
        }
    }
}

/// Ensures biosphere nodes for flow keys
pub struct NodeReconciler<'a> {
    db: &'a dyn FlowDatabase,
    mode: ReconcileMode,
}

impl<'a> NodeReconciler<'a> {
    /// Create a sequential reconciler
    #[inline]
    #[must_use]
    pub fn new(db: &'a dyn FlowDatabase) -> Self {
        Self {
            db,
            mode: ReconcileMode::Sequential,
        }
    }

    /// With reconciliation mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: ReconcileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Ensure a node for every key, then flush the database
    ///
    /// Keys are processed in sorted order in sequential mode; both report
    /// lists are sorted regardless of mode.
    ///
    /// # Errors
    /// Any store failure other than a missing node, or a worker pool that
    /// cannot be started.
    pub fn reconcile(&self, database: &str, keys: &BTreeSet<FlowKey>) -> ImportResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        match self.mode {
            ReconcileMode::Sequential => {
                for key in keys {
                    let ensured = self.ensure(database, key)?;
                    report.record(key.clone(), &ensured);
                }
            }
            ReconcileMode::Parallel { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("lcia-reconcile-{i}"))
                    .build()?;
                let outcomes = pool.install(|| {
                    keys.par_iter()
                        .map(|key| self.ensure(database, key).map(|e| (key.clone(), e)))
                        .collect::<StoreResult<Vec<_>>>()
                })?;
                for (key, ensured) in &outcomes {
                    report.record(key.clone(), ensured);
                }
                report.created.sort();
                report.existing.sort();
            }
        }

        self.db.flush()?;
        tracing::info!(
            database,
            created = report.created.len(),
            existing = report.existing.len(),
            "reconciled biosphere nodes"
        );
        Ok(report)
    }

    fn ensure(&self, database: &str, key: &FlowKey) -> StoreResult<Ensured> {
        let ensured = self.db.ensure_node(FlowNode::emission(database, key))?;
        if ensured.created() {
            tracing::warn!(
                database,
                name = %key.name,
                categories = %key.categories,
                "node does not exist, creating"
            );
        } else {
            tracing::info!(
                database,
                name = %key.name,
                categories = %key.categories,
                "node already exists"
            );
        }
        Ok(ensured)
    }
}
