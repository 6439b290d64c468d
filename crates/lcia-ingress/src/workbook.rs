//! Workbook sources
//!
//! [`SheetSource`] is what reshaping reads from. [`CalamineWorkbook`] reads
//! xlsx/xlsm/xlsb/xls/ods files; [`MemoryWorkbook`] holds tables built in
//! code.

use crate::error::{IngressError, IngressResult, SchemaError};
use crate::table::{Cell, Table};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Source of named sheets
pub trait SheetSource {
    /// Names of the sheets present
    fn sheet_names(&self) -> Vec<String>;

    /// Read a sheet; the first row is the header
    ///
    /// # Errors
    /// [`SchemaError::MissingSheet`] when absent, decoding failures otherwise.
    fn read_sheet(&mut self, name: &str) -> IngressResult<Table>;

    /// Fail unless a sheet is present
    ///
    /// # Errors
    /// [`SchemaError::MissingSheet`].
    fn require_sheet(&self, name: &str) -> Result<(), SchemaError> {
        let available = self.sheet_names();
        if available.iter().any(|s| s == name) {
            Ok(())
        } else {
            Err(SchemaError::MissingSheet {
                sheet: name.to_string(),
                available,
            })
        }
    }
}

/// Spreadsheet file read through calamine
pub struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for CalamineWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalamineWorkbook")
            .field("path", &self.path)
            .field("sheets", &self.sheets.sheet_names())
            .finish()
    }
}

impl CalamineWorkbook {
    /// Open a workbook, detecting the format from the extension
    ///
    /// # Errors
    /// [`IngressError::Open`] when the file cannot be opened or decoded.
    pub fn open(path: impl AsRef<Path>) -> IngressResult<Self> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|source| IngressError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, sheets })
    }

    /// Path the workbook was opened from
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Error(e.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

impl SheetSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> IngressResult<Table> {
        self.require_sheet(name)?;
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| IngressError::Read {
                sheet: name.to_string(),
                source,
            })?;
        // calamine trims leading empty rows; start is 0-based
        let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);
        let grid = range
            .rows()
            .map(|row| row.iter().map(convert).collect())
            .collect();
        Ok(Table::from_grid_at(name, first_row, grid))
    }
}

/// Workbook assembled in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Table>,
}

impl MemoryWorkbook {
    /// Create empty workbook
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, keyed by the table name
    #[must_use]
    pub fn with_sheet(mut self, table: Table) -> Self {
        self.sheets.insert(table.name().to_string(), table);
        self
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    fn read_sheet(&mut self, name: &str) -> IngressResult<Table> {
        self.require_sheet(name)?;
        Ok(self.sheets[name].clone())
    }
}
