//! Unit normalization strategy
//!
//! Maps abbreviated unit strings to their canonical long form. Strings not
//! in the table, such as indicator units (`kg CO2-Eq`), are kept as-is.

use crate::dataset::MethodDataset;
use crate::strategy::{Strategy, StrategyError};
use std::collections::HashMap;

/// Abbreviation to canonical unit
pub const DEFAULT_UNITS: &[(&str, &str)] = &[
    ("a", "year"),
    ("Bq", "Becquerel"),
    ("g", "gram"),
    ("GJ", "gigajoule"),
    ("h", "hour"),
    ("ha", "hectare"),
    ("hr", "hour"),
    ("kBq", "kilo Becquerel"),
    ("kg", "kilogram"),
    ("kgkm", "kilogram kilometer"),
    ("kg sw", "kilogram separative work unit"),
    ("kg SWU", "kilogram separative work unit"),
    ("kJ", "kilojoule"),
    ("km", "kilometer"),
    ("km*year", "kilometer-year"),
    ("kWh", "kilowatt hour"),
    ("l", "litre"),
    ("lu", "livestock unit"),
    ("m", "meter"),
    ("m*year", "meter-year"),
    ("m2", "square meter"),
    ("m2*year", "square meter-year"),
    ("m2a", "square meter-year"),
    ("m3", "cubic meter"),
    ("m3*year", "cubic meter-year"),
    ("m3a", "cubic meter-year"),
    ("metric ton*km", "ton kilometer"),
    ("MJ", "megajoule"),
    ("MWh", "megawatt hour"),
    ("Nm3", "cubic meter"),
    ("p", "unit"),
    ("person*km", "person kilometer"),
    ("pkm", "person kilometer"),
    ("t", "ton"),
    ("tkm", "ton kilometer"),
    ("vkm", "vehicle kilometer"),
    ("Wh", "watt hour"),
];

/// Canonicalize method units
#[derive(Debug, Clone)]
pub struct NormalizeUnits {
    table: HashMap<String, String>,
}

impl Default for NormalizeUnits {
    fn default() -> Self {
        Self::with_table(DEFAULT_UNITS.iter().copied())
    }
}

impl NormalizeUnits {
    /// Strategy with the default table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy with a custom table
    #[must_use]
    pub fn with_table<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Canonical form of a unit string
    #[must_use]
    pub fn normalize(&self, unit: &str) -> String {
        let trimmed = unit.trim();
        self.table
            .get(trimmed)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

}

impl Strategy for NormalizeUnits {
    fn name(&self) -> &str {
        "normalize_units"
    }

    fn apply(&self, mut data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> {
        for unit in data.iter_mut().filter_map(|ds| ds.unit.as_mut()) {
            *unit = self.normalize(unit);
        }
        Ok(data)
    }
}
