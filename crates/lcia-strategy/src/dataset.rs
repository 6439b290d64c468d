//! Working data the strategies transform
//!
//! CF records are grouped into one [`MethodDataset`] per method identity;
//! each record becomes a [`CfExchange`] that strategies annotate in place
//! until it is linked to a biosphere node.

use lcia_model::{Categories, CfRecord, CharacterizationFactor, Method, MethodKey, NodeKey, UnitsMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of an exchange in a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeType {
    /// References a biosphere flow
    Biosphere,
}

/// One characterization factor inside a method dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfExchange {
    /// Flow name
    pub name: String,
    /// Flow category path
    pub categories: Categories,
    /// Factor value
    pub amount: f64,
    /// Exchange role, set by strategies
    #[serde(rename = "type")]
    pub exchange_type: Option<ExchangeType>,
    /// Linked node, set by the link strategy
    pub input: Option<NodeKey>,
}

impl CfExchange {
    /// Whether the exchange resolved to a node
    #[inline]
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.input.is_some()
    }
}

impl From<CfRecord> for CfExchange {
    fn from(record: CfRecord) -> Self {
        Self {
            name: record.name,
            categories: record.categories,
            amount: record.amount,
            exchange_type: None,
            input: None,
        }
    }
}

/// One LCIA method under import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDataset {
    /// Method identity
    pub name: MethodKey,
    /// Indicator unit
    pub unit: Option<String>,
    /// Free text description
    pub description: String,
    /// Source file name
    pub filename: String,
    /// Characterization factors
    pub exchanges: Vec<CfExchange>,
}

impl MethodDataset {
    /// Exchanges without a linked node
    pub fn unlinked(&self) -> impl Iterator<Item = &CfExchange> {
        self.exchanges.iter().filter(|e| !e.is_linked())
    }

    /// Number of unlinked exchanges
    #[must_use]
    pub fn num_unlinked(&self) -> usize {
        self.unlinked().count()
    }

    /// Persistable method built from the linked exchanges only
    #[must_use]
    pub fn to_method(&self) -> Method {
        Method {
            key: self.name.clone(),
            unit: self.unit.clone(),
            description: self.description.clone(),
            filename: self.filename.clone(),
            factors: self
                .exchanges
                .iter()
                .filter_map(|e| {
                    e.input.clone().map(|flow| CharacterizationFactor {
                        flow,
                        amount: e.amount,
                    })
                })
                .collect(),
        }
    }
}

/// Group records into method datasets, in order of first appearance
///
/// Each dataset takes its unit from `units`; methods absent from `units`
/// get no unit.
#[must_use]
pub fn separate_methods(records: Vec<CfRecord>, units: &UnitsMap, filename: &str) -> Vec<MethodDataset> {
    let mut datasets: Vec<MethodDataset> = Vec::new();
    let mut positions: HashMap<MethodKey, usize> = HashMap::new();

    for record in records {
        let index = *positions.entry(record.method.clone()).or_insert_with(|| {
            datasets.push(MethodDataset {
                name: record.method.clone(),
                unit: units.get(&record.method).cloned(),
                description: format!("{} imported from {filename}", record.method),
                filename: filename.to_string(),
                exchanges: Vec::new(),
            });
            datasets.len() - 1
        });
        datasets[index].exchanges.push(record.into());
    }
    datasets
}
