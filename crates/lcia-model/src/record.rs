//! Characterization-factor records produced by workbook reshaping

use crate::flow::{Categories, FlowKey};
use crate::method::MethodKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Method identity to indicator unit, in sheet order
pub type UnitsMap = IndexMap<MethodKey, String>;

/// One row of the characterization-factor sheet, reshaped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfRecord {
    /// Method identity
    pub method: MethodKey,
    /// Flow name
    pub name: String,
    /// Compartment column as read
    pub compartment: String,
    /// Subcompartment column as read
    pub subcompartment: Option<String>,
    /// Category path derived from compartment and subcompartment
    pub categories: Categories,
    /// Factor value
    pub amount: f64,
}

impl CfRecord {
    /// Build a record, deriving the category path from the columns
    #[must_use]
    pub fn new(
        method: MethodKey,
        name: impl Into<String>,
        compartment: impl Into<String>,
        subcompartment: Option<String>,
        amount: f64,
    ) -> Self {
        let compartment = compartment.into();
        let categories = Categories::from_columns(&compartment, subcompartment.as_deref());
        Self {
            method,
            name: name.into(),
            compartment,
            subcompartment,
            categories,
            amount,
        }
    }

    /// Flow identity referenced by this record
    #[inline]
    #[must_use]
    pub fn flow_key(&self) -> FlowKey {
        FlowKey::new(self.name.clone(), self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate_change() -> MethodKey {
        MethodKey::new("ReCiPe", "midpoint", "climate change")
    }

    #[test]
    fn unspecified_record() {
        let record = CfRecord::new(
            climate_change(),
            "Carbon dioxide",
            "air",
            Some("unspecified".to_string()),
            1.0,
        );
        assert_eq!(record.categories, Categories::compartment("air"));
        assert_eq!(
            record.flow_key(),
            FlowKey::new("Carbon dioxide", Categories::compartment("air"))
        );
    }

    #[test]
    fn subcompartment_gives_distinct_flow_key() {
        let a = CfRecord::new(climate_change(), "Carbon dioxide", "air", None, 1.0);
        let b = CfRecord::new(
            climate_change(),
            "Carbon dioxide",
            "air",
            Some("urban air close to ground".to_string()),
            1.0,
        );
        assert_ne!(a.flow_key(), b.flow_key());
    }
}
