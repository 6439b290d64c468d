//! Workbook reshaping
//!
//! Turns the `CFs` and `Indicators` sheets into characterization-factor
//! records, a units map and the deduplicated set of referenced flows.
//! Both sheets are schema-checked before any record is produced.

use crate::error::{IngressResult, SchemaError};
use crate::table::Table;
use crate::workbook::{CalamineWorkbook, SheetSource};
use lcia_model::{CfRecord, FlowKey, MethodKey, UnitsMap};
use std::collections::BTreeSet;
use std::path::Path;

/// Sheet holding characterization factors
pub const CFS_SHEET: &str = "CFs";

/// Sheet mapping methods to units
pub const INDICATORS_SHEET: &str = "Indicators";

/// Column headers
pub mod columns {
    /// Method family
    pub const METHOD: &str = "Method";
    /// Impact category
    pub const CATEGORY: &str = "Category";
    /// Indicator
    pub const INDICATOR: &str = "Indicator";
    /// Flow name
    pub const NAME: &str = "Name";
    /// Compartment
    pub const COMPARTMENT: &str = "Compartment";
    /// Subcompartment
    pub const SUBCOMPARTMENT: &str = "Subcompartment";
    /// Factor value
    pub const CF: &str = "CF";
    /// Unit of an indicator
    pub const INDICATOR_UNIT: &str = "Indicator Unit";
}

/// Output of reshaping a workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedWorkbook {
    /// One record per CF row, in sheet order
    pub records: Vec<CfRecord>,
    /// Method identity to indicator unit
    pub units: UnitsMap,
    /// Distinct flows referenced by the records
    pub flow_keys: BTreeSet<FlowKey>,
}

struct MethodColumns {
    method: usize,
    category: usize,
    indicator: usize,
}

impl MethodColumns {
    fn locate(table: &Table) -> Result<Self, SchemaError> {
        Ok(Self {
            method: table.column(columns::METHOD)?,
            category: table.column(columns::CATEGORY)?,
            indicator: table.column(columns::INDICATOR)?,
        })
    }

    fn key(&self, table: &Table, row: usize) -> Result<MethodKey, SchemaError> {
        Ok(MethodKey::new(
            table.required_text(row, self.method)?,
            table.required_text(row, self.category)?,
            table.required_text(row, self.indicator)?,
        ))
    }
}

/// Reshape the CF sheet into records
///
/// # Errors
/// Missing columns or required values, non-numeric factors.
pub fn cf_records(table: &Table) -> Result<Vec<CfRecord>, SchemaError> {
    let method = MethodColumns::locate(table)?;
    let name = table.column(columns::NAME)?;
    let compartment = table.column(columns::COMPARTMENT)?;
    let subcompartment = table.column(columns::SUBCOMPARTMENT)?;
    let cf = table.column(columns::CF)?;

    (0..table.len())
        .map(|row| {
            Ok(CfRecord::new(
                method.key(table, row)?,
                table.required_text(row, name)?,
                table.required_text(row, compartment)?,
                table
                    .optional_text(row, subcompartment)
                    .filter(|s| !s.trim().is_empty()),
                table.required_number(row, cf)?,
            ))
        })
        .collect()
}

/// Reshape the indicators sheet into a units map
///
/// A repeated method identity keeps the last unit seen.
///
/// # Errors
/// Missing columns or required values.
pub fn units_map(table: &Table) -> Result<UnitsMap, SchemaError> {
    let method = MethodColumns::locate(table)?;
    let unit = table.column(columns::INDICATOR_UNIT)?;

    let mut units = UnitsMap::with_capacity(table.len());
    for row in 0..table.len() {
        let key = method.key(table, row)?;
        let value = table.required_text(row, unit)?;
        if let Some(previous) = units.insert(key.clone(), value) {
            tracing::debug!(method = %key, previous = %previous, "unit redefined, keeping last");
        }
    }
    Ok(units)
}

/// Distinct flows referenced by records
#[must_use]
pub fn flow_keys(records: &[CfRecord]) -> BTreeSet<FlowKey> {
    records.iter().map(CfRecord::flow_key).collect()
}

/// Reshape both sheets of a workbook
///
/// # Errors
/// [`SchemaError`] for layout problems, decoding failures from the source.
pub fn reshape<S: SheetSource + ?Sized>(source: &mut S) -> IngressResult<ParsedWorkbook> {
    source.require_sheet(CFS_SHEET)?;
    source.require_sheet(INDICATORS_SHEET)?;

    let cfs = source.read_sheet(CFS_SHEET)?;
    let indicators = source.read_sheet(INDICATORS_SHEET)?;

    let records = cf_records(&cfs)?;
    let units = units_map(&indicators)?;
    let flow_keys = flow_keys(&records);

    tracing::debug!(
        records = records.len(),
        methods = units.len(),
        flows = flow_keys.len(),
        "reshaped workbook"
    );

    Ok(ParsedWorkbook {
        records,
        units,
        flow_keys,
    })
}

/// Open a workbook file and reshape it
///
/// # Errors
/// See [`CalamineWorkbook::open`] and [`reshape`].
pub fn parse_lcia_file(path: impl AsRef<Path>) -> IngressResult<ParsedWorkbook> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading LCIA workbook");
    let mut workbook = CalamineWorkbook::open(path)?;
    reshape(&mut workbook)
}
