//! LCIA workbook ingress
//!
//! The boundary between characterization-factor spreadsheets and the typed
//! records the importer works on.
//!
//! # Core Operations
//!
//! - **Read**: open a workbook through [`CalamineWorkbook`] (or build a
//!   [`MemoryWorkbook`]) and decode sheets into header-addressed [`Table`]s
//! - **Reshape**: compose method identities, normalize category paths,
//!   build the units map and deduplicate flow keys
//!
//! # Architecture
//!
//! ```text
//! workbook → SheetSource → Table("CFs")        → Vec<CfRecord> → BTreeSet<FlowKey>
//!                        → Table("Indicators") → UnitsMap
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lcia_ingress::parse_lcia_file;
//!
//! let parsed = parse_lcia_file("LCIA_Implementation_3.8.xlsx")?;
//! println!("{} CFs over {} flows", parsed.records.len(), parsed.flow_keys.len());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod reshape;
pub mod table;
pub mod workbook;

// Re-exports for convenience
pub use error::{IngressError, IngressResult, SchemaError};
pub use reshape::{
    cf_records, flow_keys, parse_lcia_file, reshape, units_map, ParsedWorkbook, CFS_SHEET,
    INDICATORS_SHEET,
};
pub use table::{Cell, Table};
pub use workbook::{CalamineWorkbook, MemoryWorkbook, SheetSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
