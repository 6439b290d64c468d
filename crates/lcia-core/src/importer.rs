//! LCIA method importer
//!
//! Holds the method datasets of one workbook while strategies transform
//! them, then reports and persists the result. The strategy pipeline is
//! injected, so the same importer serves any strategy order.

use crate::report::{DegradedMethod, ErrorReport, ImportStats, ReportError};
use lcia_model::{CfRecord, UnitsMap};
use lcia_store::{MethodStore, StoreResult, WriteSummary};
use lcia_strategy::{separate_methods, MethodDataset, StrategyError, StrategyPipeline};
use std::path::{Path, PathBuf};

/// Importer over the methods of one workbook
#[derive(Debug)]
pub struct LciaImporter {
    file_name: String,
    data: Vec<MethodDataset>,
    strategies: StrategyPipeline,
    applied_strategies: Vec<String>,
}

impl LciaImporter {
    /// Group records into methods and attach a strategy pipeline
    #[must_use]
    pub fn new(
        records: Vec<CfRecord>,
        units: &UnitsMap,
        file_name: impl Into<String>,
        strategies: StrategyPipeline,
    ) -> Self {
        let file_name = file_name.into();
        let data = separate_methods(records, units, &file_name);
        tracing::debug!(file = %file_name, methods = data.len(), "separated methods");
        Self {
            file_name,
            data,
            strategies,
            applied_strategies: Vec::new(),
        }
    }

    /// Source workbook name
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Current datasets
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[MethodDataset] {
        &self.data
    }

    /// Names of strategies applied so far
    #[inline]
    #[must_use]
    pub fn applied_strategies(&self) -> &[String] {
        &self.applied_strategies
    }

    /// Run the strategy pipeline over the datasets
    ///
    /// # Errors
    /// The first failing strategy. The datasets are consumed by the failed
    /// run and the importer is left empty.
    pub fn apply_strategies(&mut self) -> Result<(), StrategyError> {
        let data = std::mem::take(&mut self.data);
        self.data = self.strategies.run(data, &mut self.applied_strategies)?;
        Ok(())
    }

    /// Count methods, factors and unlinked factors
    #[must_use]
    pub fn statistics(&self) -> ImportStats {
        let stats = ImportStats::from_datasets(&self.data);
        tracing::info!(
            methods = stats.methods,
            cfs = stats.cfs,
            unlinked = stats.unlinked,
            "{} methods, {} cfs, {} unlinked cfs",
            stats.methods,
            stats.cfs,
            stats.unlinked
        );
        stats
    }

    /// Methods that would be persisted with factors missing
    #[must_use]
    pub fn degraded(&self) -> Vec<DegradedMethod> {
        self.data
            .iter()
            .filter_map(|ds| {
                let unlinked = ds.num_unlinked();
                (unlinked > 0).then(|| DegradedMethod {
                    method: ds.name.clone(),
                    unlinked,
                    total: ds.exchanges.len(),
                })
            })
            .collect()
    }

    /// Write the unlinked factors to `<dir>/<name>.json`
    ///
    /// Returns `None` without touching the filesystem when everything
    /// linked.
    ///
    /// # Errors
    /// Report IO and encoding failures.
    pub fn write_error_report(&self, dir: &Path, name: &str) -> Result<Option<PathBuf>, ReportError> {
        let report = ErrorReport::from_datasets(&self.file_name, &self.data);
        if report.is_empty() {
            return Ok(None);
        }
        let path = report.write(dir, name)?;
        tracing::warn!(
            path = %path.display(),
            unlinked = report.unlinked.len(),
            "wrote unlinked characterization factors"
        );
        Ok(Some(path))
    }

    /// Remove unlinked factors, returning how many were dropped
    pub fn drop_unlinked(&mut self) -> usize {
        let mut dropped = 0;
        for ds in &mut self.data {
            let before = ds.exchanges.len();
            ds.exchanges.retain(|e| e.is_linked());
            dropped += before - ds.exchanges.len();
        }
        if dropped > 0 {
            tracing::info!(dropped, "dropped unlinked characterization factors");
        }
        dropped
    }

    /// Persist every method as one batch
    ///
    /// Only linked factors are stored.
    ///
    /// # Errors
    /// Store failures; nothing is persisted in that case.
    pub fn write_methods(&self, store: &dyn MethodStore, overwrite: bool) -> StoreResult<WriteSummary> {
        let methods = self.data.iter().map(MethodDataset::to_method).collect();
        let summary = store.write_methods(methods, overwrite)?;
        for key in &summary.conflicts {
            tracing::warn!(method = %key, "method already exists, not overwritten");
        }
        tracing::info!(
            written = summary.written.len(),
            replaced = summary.replaced.len(),
            conflicts = summary.conflicts.len(),
            "wrote methods"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcia_model::{Categories, FlowKey, FlowNode, MethodKey};
    use lcia_store::{FlowDatabase, MemoryProject};
    use lcia_strategy::{FnStrategy, LinkField};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn climate() -> MethodKey {
        MethodKey::new("ReCiPe", "midpoint", "climate change")
    }

    fn records() -> Vec<CfRecord> {
        vec![
            CfRecord::new(climate(), "Carbon dioxide", "air", None, 1.0),
            CfRecord::new(climate(), "Unobtainium", "soil", None, 2.0),
        ]
    }

    fn project() -> MemoryProject {
        let project = MemoryProject::new();
        project
            .create_node(FlowNode::emission(
                "biosphere3",
                &FlowKey::new("Carbon dioxide", Categories::compartment("air")),
            ))
            .unwrap();
        project
    }

    fn importer(project: &MemoryProject) -> LciaImporter {
        let pipeline = StrategyPipeline::lcia(project, "biosphere3", &LinkField::DEFAULT, false).unwrap();
        LciaImporter::new(records(), &UnitsMap::new(), "cfs.xlsx", pipeline)
    }

    #[test]
    fn strategies_recorded_in_order() {
        let project = project();
        let mut importer = importer(&project);
        importer.apply_strategies().unwrap();
        assert_eq!(importer.applied_strategies().len(), 4);
        assert_eq!(importer.applied_strategies()[3], "link_iterable_by_fields");
    }

    #[test]
    fn statistics_and_degraded() {
        let project = project();
        let mut importer = importer(&project);
        importer.apply_strategies().unwrap();

        let stats = importer.statistics();
        assert_eq!((stats.methods, stats.cfs, stats.unlinked), (1, 2, 1));
        assert_eq!(
            importer.degraded(),
            vec![DegradedMethod {
                method: climate(),
                unlinked: 1,
                total: 2
            }]
        );
    }

    #[test]
    fn error_report_only_when_unlinked() {
        let dir = tempdir().unwrap();
        let project = project();
        let mut importer = importer(&project);
        importer.apply_strategies().unwrap();

        let path = importer
            .write_error_report(dir.path(), "errors_custom_lcia")
            .unwrap();
        assert!(path.is_some_and(|p| p.exists()));

        importer.drop_unlinked();
        let other = dir.path().join("second");
        assert_eq!(importer.write_error_report(&other, "errors_custom_lcia").unwrap(), None);
        assert!(!other.exists());
    }

    #[test]
    fn drop_unlinked_counts() {
        let project = project();
        let mut importer = importer(&project);
        importer.apply_strategies().unwrap();
        assert_eq!(importer.drop_unlinked(), 1);
        assert_eq!(importer.drop_unlinked(), 0);
        assert!(importer.degraded().is_empty());
    }

    #[test]
    fn writes_linked_factors_only() {
        let project = project();
        let mut importer = importer(&project);
        importer.apply_strategies().unwrap();

        let summary = importer.write_methods(&project, false).unwrap();
        assert_eq!(summary.written, vec![climate()]);

        let stored = project.get_method(&climate()).unwrap().unwrap();
        assert_eq!(stored.num_cfs(), 1);
        assert_eq!(
            stored.description,
            "('ReCiPe', 'midpoint', 'climate change') imported from cfs.xlsx"
        );
    }

    #[test]
    fn failing_strategy_propagates() {
        let pipeline = StrategyPipeline::new().with(FnStrategy::new("fail", |_| {
            Err(StrategyError::failed("fail", "bad data"))
        }));
        let mut importer = LciaImporter::new(records(), &UnitsMap::new(), "cfs.xlsx", pipeline);
        assert!(importer.apply_strategies().is_err());
        assert!(importer.applied_strategies().is_empty());
    }
}
