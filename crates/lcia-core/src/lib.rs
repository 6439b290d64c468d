//! LCIA Core - characterization factor import
//!
//! Takes a reshaped LCIA workbook through the rest of the import:
//! - Ensures a biosphere node exists for every referenced flow
//! - Groups factors into methods and runs the strategy pipeline
//! - Reports factors that did not link
//! - Persists the methods as one batch
//!
//! # Example
//!
//! ```rust,no_run
//! use lcia_core::custom_methods_importer;
//! use lcia_store::FileProject;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let project = FileProject::open("project")?;
//! let summary = custom_methods_importer(&project, "custom_cfs.xlsx", "biosphere3", false)?;
//!
//! println!("{} methods, {} unlinked cfs", summary.stats.methods, summary.stats.unlinked);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod importer;
pub mod reconcile;
pub mod report;
pub mod runner;

// Re-exports for convenience
pub use config::{ConfigError, ImporterConfig, ReconcileMode, DEFAULT_REPORT_NAME};
pub use error::{ImportError, ImportResult};
pub use importer::LciaImporter;
pub use reconcile::{NodeReconciler, ReconcileReport};
pub use report::{DegradedMethod, ErrorReport, ImportStats, ReportError, UnlinkedCf, REPORT_EXTENSION};
pub use runner::{custom_methods_importer, CustomMethodsImporter, ImportSummary};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running LCIA imports
    pub use crate::{
        custom_methods_importer, CustomMethodsImporter, ImportError, ImportSummary, ImporterConfig,
        LciaImporter, NodeReconciler, ReconcileMode,
    };
    pub use lcia_store::{FileProject, FlowDatabase, MemoryProject, MethodStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
