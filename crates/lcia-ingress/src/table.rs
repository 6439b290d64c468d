//! Header-addressed sheet contents

use crate::error::SchemaError;

/// Cell value after decoding
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value
    Empty,
    /// Text
    Text(String),
    /// Numeric value (integers included)
    Number(f64),
    /// Boolean
    Bool(bool),
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl Cell {
    /// Text form; `None` for empty cells and error values
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Empty | Self::Error(_) => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
        }
    }

    /// Numeric form; text is parsed after trimming
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the cell holds nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Error(e) => f.write_str(e),
            other => f.write_str(&other.text().unwrap_or_default()),
        }
    }
}

static EMPTY: Cell = Cell::Empty;

/// One sheet: header row plus data rows
///
/// Each data row remembers the spreadsheet row it came from so errors point
/// at the cell a user sees, even after blank rows are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    header_row: usize,
    headers: Vec<String>,
    rows: Vec<(usize, Vec<Cell>)>,
}

impl Table {
    /// Build a table with the header on row 1; header names are trimmed and
    /// fully empty rows dropped
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self::with_header_row(name, 1, headers, rows)
    }

    /// Build a table whose header sits on the given 1-based spreadsheet row
    #[must_use]
    pub fn with_header_row(
        name: impl Into<String>,
        header_row: usize,
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self {
            name: name.into(),
            header_row,
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .filter(|(_, row)| !row.iter().all(Cell::is_empty))
                .map(|(i, row)| (header_row + 1 + i, row))
                .collect(),
        }
    }

    /// Build a table from a raw grid whose first row is the header
    #[must_use]
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        Self::from_grid_at(name, 1, grid)
    }

    /// Build a table from a raw grid starting at a 1-based spreadsheet row
    #[must_use]
    pub fn from_grid_at(name: impl Into<String>, first_row: usize, mut grid: Vec<Vec<Cell>>) -> Self {
        if grid.is_empty() {
            return Self::with_header_row(name, first_row, Vec::new(), Vec::new());
        }
        let headers = grid
            .remove(0)
            .iter()
            .map(|c| c.text().unwrap_or_default())
            .collect();
        Self::with_header_row(name, first_row, headers, grid)
    }

    /// Sheet name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header names
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header
    ///
    /// # Errors
    /// [`SchemaError::MissingColumn`] when no header matches.
    pub fn column(&self, header: &str) -> Result<usize, SchemaError> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| SchemaError::MissingColumn {
                sheet: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Cell at a data row and column; short rows read as empty
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|(_, cells)| cells.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Spreadsheet row number of a data row
    #[must_use]
    pub fn sheet_row(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map_or(self.header_row + 1 + row, |(line, _)| *line)
    }

    /// Required non-empty text
    ///
    /// # Errors
    /// [`SchemaError::MissingValue`] for empty cells, blank text and errors.
    pub fn required_text(&self, row: usize, column: usize) -> Result<String, SchemaError> {
        self.optional_text(row, column)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SchemaError::MissingValue {
                sheet: self.name.clone(),
                row: self.sheet_row(row),
                column: self.headers[column].clone(),
            })
    }

    /// Optional text, `None` for empty cells
    #[must_use]
    pub fn optional_text(&self, row: usize, column: usize) -> Option<String> {
        self.cell(row, column).text()
    }

    /// Required number
    ///
    /// # Errors
    /// [`SchemaError::MissingValue`] for empty cells,
    /// [`SchemaError::InvalidNumber`] for anything unparseable.
    pub fn required_number(&self, row: usize, column: usize) -> Result<f64, SchemaError> {
        let cell = self.cell(row, column);
        if cell.is_empty() {
            return Err(SchemaError::MissingValue {
                sheet: self.name.clone(),
                row: self.sheet_row(row),
                column: self.headers[column].clone(),
            });
        }
        cell.number().ok_or_else(|| SchemaError::InvalidNumber {
            sheet: self.name.clone(),
            row: self.sheet_row(row),
            column: self.headers[column].clone(),
            value: cell.to_string(),
        })
    }
}
