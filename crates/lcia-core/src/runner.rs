//! Import orchestration
//!
//! Runs the three stages against one project:
//! 1. reshape the workbook (nothing is touched if this fails)
//! 2. reconcile biosphere nodes for every referenced flow
//! 3. import methods through the strategy pipeline, report unlinked
//!    factors, then persist

use crate::config::ImporterConfig;
use crate::error::ImportResult;
use crate::importer::LciaImporter;
use crate::reconcile::{NodeReconciler, ReconcileReport};
use crate::report::{DegradedMethod, ImportStats};
use lcia_ingress::{parse_lcia_file, reshape, ParsedWorkbook, SheetSource};
use lcia_store::{FlowDatabase, MethodStore, WriteSummary};
use lcia_strategy::StrategyPipeline;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one import run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Source workbook name
    pub file: String,
    /// Target biosphere database
    pub biosphere: String,
    /// Nodes created or found
    pub reconcile: ReconcileReport,
    /// Strategies applied, in order
    pub applied_strategies: Vec<String>,
    /// Counts after linking
    pub stats: ImportStats,
    /// Error report path, if any factor stayed unlinked
    pub error_report: Option<PathBuf>,
    /// Methods persisted with factors missing
    pub degraded: Vec<DegradedMethod>,
    /// Unlinked factors dropped before writing
    pub dropped_unlinked: usize,
    /// Method write outcome
    pub write: WriteSummary,
}

impl ImportSummary {
    /// Every factor linked and every method written
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty() && !self.write.has_conflicts()
    }
}

/// Configured import runner over a project
pub struct CustomMethodsImporter<'a, P> {
    project: &'a P,
    config: ImporterConfig,
}

impl<'a, P> CustomMethodsImporter<'a, P>
where
    P: FlowDatabase + MethodStore,
{
    /// Create runner with default configuration
    #[inline]
    #[must_use]
    pub fn new(project: &'a P) -> Self {
        Self {
            project,
            config: ImporterConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: ImporterConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Import a workbook file into `biosphere`
    ///
    /// # Errors
    /// See [`CustomMethodsImporter::import_parsed`]; additionally, workbook
    /// read and layout errors, raised before the project is touched.
    pub fn run(&self, lcia_file: &Path, biosphere: &str) -> ImportResult<ImportSummary> {
        tracing::info!(file = %lcia_file.display(), biosphere, "importing LCIA workbook");
        self.config.validate()?;
        let parsed = parse_lcia_file(lcia_file)?;
        let file_name = lcia_file
            .file_name()
            .map_or_else(|| lcia_file.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.import_parsed(parsed, &file_name, biosphere)
    }

    /// Import from any sheet source
    ///
    /// # Errors
    /// As [`CustomMethodsImporter::run`].
    pub fn run_source<S>(&self, source: &mut S, file_name: &str, biosphere: &str) -> ImportResult<ImportSummary>
    where
        S: SheetSource + ?Sized,
    {
        self.config.validate()?;
        let parsed = reshape(source)?;
        self.import_parsed(parsed, file_name, biosphere)
    }

    /// Reconcile, link, report and persist an already reshaped workbook
    ///
    /// # Errors
    /// Store failures, strategy failures (ambiguous link candidates) and
    /// report write failures. Nodes created before a failure stay created.
    pub fn import_parsed(
        &self,
        parsed: ParsedWorkbook,
        file_name: &str,
        biosphere: &str,
    ) -> ImportResult<ImportSummary> {
        let ParsedWorkbook {
            records,
            units,
            flow_keys,
        } = parsed;
        tracing::info!(
            records = records.len(),
            flows = flow_keys.len(),
            methods = units.len(),
            "reshaped workbook"
        );

        let reconcile = NodeReconciler::new(self.project)
            .with_mode(self.config.reconcile)
            .reconcile(biosphere, &flow_keys)?;

        let pipeline =
            StrategyPipeline::lcia(self.project, biosphere, &self.config.link_fields, self.config.relink)?;
        let mut importer = LciaImporter::new(records, &units, file_name, pipeline);
        importer.apply_strategies()?;

        let stats = importer.statistics();
        let error_report =
            importer.write_error_report(&self.config.report_dir, &self.config.report_name)?;
        let degraded = importer.degraded();
        let dropped_unlinked = if self.config.drop_unlinked {
            importer.drop_unlinked()
        } else {
            0
        };

        let write = importer.write_methods(self.project, self.config.overwrite)?;

        Ok(ImportSummary {
            file: file_name.to_string(),
            biosphere: biosphere.to_string(),
            reconcile,
            applied_strategies: importer.applied_strategies().to_vec(),
            stats,
            error_report,
            degraded,
            dropped_unlinked,
            write,
        })
    }
}

/// Import custom LCIA methods from a workbook
///
/// Ensures every referenced biosphere flow exists in
/// `biosphere_database_name`, links the factors to those nodes, writes
/// unlinked factors to `errors_custom_lcia.json` in the working directory
/// and persists the methods. Existing methods are replaced only when
/// `overwrite` is set.
///
/// # Errors
/// Workbook read or layout errors, store failures, strategy failures and
/// report write failures.
pub fn custom_methods_importer<P>(
    project: &P,
    lcia_file_path: impl AsRef<Path>,
    biosphere_database_name: &str,
    overwrite: bool,
) -> ImportResult<ImportSummary>
where
    P: FlowDatabase + MethodStore,
{
    CustomMethodsImporter::new(project)
        .with_config(ImporterConfig::default().with_overwrite(overwrite))
        .run(lcia_file_path.as_ref(), biosphere_database_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcia_ingress::MemoryWorkbook;
    use lcia_store::MemoryProject;
    use lcia_test_utils::{cf_row, sample_workbook, BIOSPHERE, WORKBOOK_NAME};
    use tempfile::tempdir;

    #[test]
    fn import_from_source_links_everything() {
        let dir = tempdir().unwrap();
        let project = MemoryProject::new();
        let runner = CustomMethodsImporter::new(&project)
            .with_config(ImporterConfig::default().with_report_dir(dir.path()));

        let summary = runner
            .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
            .unwrap();

        assert!(summary.is_complete());
        assert_eq!(summary.reconcile.created.len(), 3);
        assert_eq!(summary.stats.cfs, 3);
        assert_eq!(summary.stats.unlinked, 0);
        assert!(summary.error_report.is_none());
        assert_eq!(summary.write.written.len(), 2);
    }

    #[test]
    fn drop_unlinked_reported_in_summary() {
        let dir = tempdir().unwrap();
        let project = MemoryProject::new();
        let config = ImporterConfig::default()
            .with_report_dir(dir.path())
            .with_drop_unlinked(true);

        // "(unspecified)" survives reshaping, so its node is created under
        // a two-level path the dropped-subcategory exchange no longer matches
        let mut source = sample_workbook()
            .cf(cf_row("climate change", "Nitrous oxide", "air", Some("(unspecified)"), 273.0))
            .build();
        let summary = CustomMethodsImporter::new(&project)
            .with_config(config)
            .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
            .unwrap();

        assert_eq!(summary.stats.unlinked, 1);
        assert_eq!(summary.dropped_unlinked, 1);
        assert_eq!(summary.degraded.len(), 1);
        assert!(!summary.is_complete());
        assert!(summary.error_report.is_some());
    }

    #[test]
    fn missing_sheet_touches_nothing() {
        let project = MemoryProject::new();
        let mut source = MemoryWorkbook::new();
        let err = CustomMethodsImporter::new(&project)
            .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
            .unwrap_err();

        assert!(err.is_schema());
        assert_eq!(project.node_count(), 0);
    }

    #[test]
    fn missing_file_is_fatal() {
        let project = MemoryProject::new();
        let err = custom_methods_importer(&project, "/nonexistent/cfs.xlsx", BIOSPHERE, false)
            .unwrap_err();
        assert!(!err.is_schema());
        assert_eq!(project.node_count(), 0);
    }
}
