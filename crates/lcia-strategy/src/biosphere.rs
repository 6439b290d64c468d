//! Biosphere tagging and category cleanup strategies

use crate::dataset::{ExchangeType, MethodDataset};
use crate::strategy::{Strategy, StrategyError};
use lcia_model::Categories;

/// Subcategory values treated as "no subcategory"
pub const UNSPECIFIED_SUBCATEGORIES: &[&str] = &["unspecified", "(unspecified)", ""];

/// Mark every exchange as a biosphere exchange
#[derive(Debug, Clone, Copy, Default)]
pub struct SetBiosphereType;

impl Strategy for SetBiosphereType {
    fn name(&self) -> &str {
        "set_biosphere_type"
    }

    fn apply(&self, mut data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> {
        for exc in data.iter_mut().flat_map(|ds| ds.exchanges.iter_mut()) {
            exc.exchange_type = Some(ExchangeType::Biosphere);
        }
        Ok(data)
    }
}

/// Collapse `(compartment, unspecified)` paths to `(compartment,)`
#[derive(Debug, Clone, Copy, Default)]
pub struct DropUnspecifiedSubcategories;

impl DropUnspecifiedSubcategories {
    /// Category path with an unspecified subcategory dropped
    #[must_use]
    pub fn clean(categories: &Categories) -> Option<Categories> {
        categories
            .sub()
            .filter(|sub| UNSPECIFIED_SUBCATEGORIES.contains(sub))
            .map(|_| categories.truncated())
    }
}

impl Strategy for DropUnspecifiedSubcategories {
    fn name(&self) -> &str {
        "drop_unspecified_subcategories"
    }

    fn apply(&self, mut data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> {
        for exc in data.iter_mut().flat_map(|ds| ds.exchanges.iter_mut()) {
            if let Some(cleaned) = Self::clean(&exc.categories) {
                exc.categories = cleaned;
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CfExchange, MethodDataset};
    use lcia_model::MethodKey;

    fn dataset(categories: Vec<Categories>) -> Vec<MethodDataset> {
        vec![MethodDataset {
            name: MethodKey::new("ReCiPe", "midpoint", "climate change"),
            unit: None,
            description: String::new(),
            filename: "cfs.xlsx".to_string(),
            exchanges: categories
                .into_iter()
                .map(|categories| CfExchange {
                    name: "Carbon dioxide".to_string(),
                    categories,
                    amount: 1.0,
                    exchange_type: None,
                    input: None,
                })
                .collect(),
        }]
    }

    #[test]
    fn set_biosphere_type_tags_all() {
        let data = SetBiosphereType
            .apply(dataset(vec![Categories::compartment("air"), Categories::compartment("water")]))
            .unwrap();
        assert!(data[0]
            .exchanges
            .iter()
            .all(|e| e.exchange_type == Some(ExchangeType::Biosphere)));
    }

    #[test]
    fn sentinels_are_dropped() {
        let data = DropUnspecifiedSubcategories
            .apply(dataset(vec![
                Categories::nested("air", "(unspecified)"),
                Categories::nested("air", ""),
                Categories::nested("air", "unspecified"),
            ]))
            .unwrap();
        assert!(data[0]
            .exchanges
            .iter()
            .all(|e| e.categories == Categories::compartment("air")));
    }

    #[test]
    fn real_subcategories_are_kept() {
        let nested = Categories::nested("air", "urban air close to ground");
        let data = DropUnspecifiedSubcategories
            .apply(dataset(vec![nested.clone(), Categories::compartment("soil")]))
            .unwrap();
        assert_eq!(data[0].exchanges[0].categories, nested);
        assert_eq!(data[0].exchanges[1].categories, Categories::compartment("soil"));
    }
}
