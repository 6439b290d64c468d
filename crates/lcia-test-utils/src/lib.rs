//! Testing utilities for LCIA workspace
//!
//! Workbook fixtures, node seeding and tracing setup.

#![allow(missing_docs)]

use lcia_ingress::{Cell, MemoryWorkbook, Table, CFS_SHEET, INDICATORS_SHEET};
use lcia_model::{Categories, FlowKey, FlowNode, MethodKey};
use lcia_store::FlowDatabase;
use std::path::PathBuf;

pub const BIOSPHERE: &str = "biosphere3";
pub const WORKBOOK_NAME: &str = "custom_cfs.xlsx";

pub const CFS_HEADERS: [&str; 7] = [
    "Method",
    "Category",
    "Indicator",
    "Name",
    "Compartment",
    "Subcompartment",
    "CF",
];
pub const INDICATORS_HEADERS: [&str; 4] = ["Method", "Category", "Indicator", "Indicator Unit"];

/// Spreadsheet fixture shipped with the ingress crate's tests
pub fn workbook_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../lcia-ingress/tests/fixtures")
        .join(name)
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn method(indicator: &str) -> MethodKey {
    MethodKey::new("ReCiPe", "midpoint", indicator)
}

pub fn climate_change() -> MethodKey {
    method("climate change")
}

pub fn flow(name: &str, compartment: &str, subcompartment: Option<&str>) -> FlowKey {
    FlowKey::new(name, Categories::from_columns(compartment, subcompartment))
}

#[derive(Debug, Clone)]
pub struct CfRow {
    pub method: MethodKey,
    pub name: String,
    pub compartment: String,
    pub subcompartment: Option<String>,
    pub cf: f64,
}

pub fn cf_row(indicator: &str, name: &str, compartment: &str, subcompartment: Option<&str>, cf: f64) -> CfRow {
    CfRow {
        method: method(indicator),
        name: name.to_string(),
        compartment: compartment.to_string(),
        subcompartment: subcompartment.map(str::to_string),
        cf,
    }
}

impl CfRow {
    fn cells(&self) -> Vec<Cell> {
        vec![
            text(self.method.method()),
            text(self.method.category()),
            text(self.method.indicator()),
            text(&self.name),
            text(&self.compartment),
            self.subcompartment.as_deref().map_or(Cell::Empty, text),
            Cell::Number(self.cf),
        ]
    }
}

/// Builds an in-memory workbook with `CFs` and `Indicators` sheets
#[derive(Debug, Clone, Default)]
pub struct WorkbookBuilder {
    cfs: Vec<CfRow>,
    units: Vec<(MethodKey, String)>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cf(mut self, row: CfRow) -> Self {
        self.cfs.push(row);
        self
    }

    #[must_use]
    pub fn unit(mut self, indicator: &str, unit: &str) -> Self {
        self.units.push((method(indicator), unit.to_string()));
        self
    }

    pub fn cfs_table(&self) -> Table {
        Table::new(
            CFS_SHEET,
            CFS_HEADERS.iter().map(|h| (*h).to_string()).collect(),
            self.cfs.iter().map(CfRow::cells).collect(),
        )
    }

    pub fn indicators_table(&self) -> Table {
        Table::new(
            INDICATORS_SHEET,
            INDICATORS_HEADERS.iter().map(|h| (*h).to_string()).collect(),
            self.units
                .iter()
                .map(|(key, unit)| {
                    vec![text(key.method()), text(key.category()), text(key.indicator()), text(unit)]
                })
                .collect(),
        )
    }

    pub fn build(&self) -> MemoryWorkbook {
        MemoryWorkbook::new()
            .with_sheet(self.cfs_table())
            .with_sheet(self.indicators_table())
    }
}

/// Two climate change factors and one acidification factor, all with units
pub fn sample_workbook() -> WorkbookBuilder {
    WorkbookBuilder::new()
        .cf(cf_row("climate change", "Carbon dioxide", "air", Some("unspecified"), 1.0))
        .cf(cf_row("climate change", "Methane", "air", Some("urban air close to ground"), 27.0))
        .cf(cf_row("acidification", "Ammonia", "air", None, 1.96))
        .unit("climate change", "kg CO2-Eq")
        .unit("acidification", "kg SO2-Eq")
}

pub fn seed_nodes(db: &dyn FlowDatabase, database: &str, keys: &[FlowKey]) {
    for key in keys {
        db.create_node(FlowNode::emission(database, key)).unwrap();
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
