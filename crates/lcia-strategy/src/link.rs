//! Field-based linking strategy
//!
//! Resolves each exchange to a node of a target database by exact equality
//! of the configured fields. Exchanges without a match stay unlinked.

use crate::dataset::{CfExchange, MethodDataset};
use crate::strategy::{Strategy, StrategyError};
use lcia_model::{FlowNode, NodeKey};
use lcia_store::FlowDatabase;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Field compared when linking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkField {
    /// Flow name
    Name,
    /// Category path
    Categories,
}

impl LinkField {
    /// Default link fields: name and categories
    pub const DEFAULT: [LinkField; 2] = [LinkField::Name, LinkField::Categories];

    fn of_exchange(self, exc: &CfExchange) -> Option<String> {
        match self {
            Self::Name => Some(exc.name.clone()),
            Self::Categories => Some(exc.categories.to_string()),
        }
    }

    fn of_node(self, node: &FlowNode) -> Option<String> {
        match self {
            Self::Name => Some(node.name.clone()),
            Self::Categories => Some(node.categories.to_string()),
        }
    }
}

impl fmt::Display for LinkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Categories => "categories",
        })
    }
}

type FieldValues = Vec<Option<String>>;

/// Link exchanges to nodes by field equality
#[derive(Debug, Clone)]
pub struct LinkIterableByFields {
    fields: Vec<LinkField>,
    candidates: HashMap<FieldValues, NodeKey>,
    relink: bool,
}

impl LinkIterableByFields {
    /// Build the candidate table from nodes
    ///
    /// # Errors
    /// [`StrategyError::NoLinkFields`] for an empty field list,
    /// [`StrategyError::AmbiguousCandidates`] when two nodes share all
    /// field values.
    pub fn new(nodes: &[FlowNode], fields: &[LinkField]) -> Result<Self, StrategyError> {
        if fields.is_empty() {
            return Err(StrategyError::NoLinkFields);
        }

        let mut grouped: HashMap<FieldValues, Vec<NodeKey>> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let values = fields.iter().map(|f| f.of_node(node)).collect();
            grouped.entry(values).or_default().push(node.key());
        }

        let mut candidates = HashMap::with_capacity(grouped.len());
        for (values, mut keys) in grouped {
            if keys.len() > 1 {
                return Err(StrategyError::AmbiguousCandidates {
                    fields: join(fields),
                    values: format!("{values:?}"),
                    count: keys.len(),
                });
            }
            if let Some(key) = keys.pop() {
                candidates.insert(values, key);
            }
        }

        Ok(Self {
            fields: fields.to_vec(),
            candidates,
            relink: false,
        })
    }

    /// Build the candidate table from every node of a database
    ///
    /// # Errors
    /// Store failures and the errors of [`LinkIterableByFields::new`].
    pub fn from_database(
        db: &dyn FlowDatabase,
        database: &str,
        fields: &[LinkField],
    ) -> Result<Self, StrategyError> {
        let nodes = db.nodes(database)?;
        tracing::debug!(database, candidates = nodes.len(), "loaded link candidates");
        Self::new(&nodes, fields)
    }

    /// Also re-link exchanges that already have a node
    #[inline]
    #[must_use]
    pub fn with_relink(mut self, relink: bool) -> Self {
        self.relink = relink;
        self
    }

    /// Number of candidate nodes
    #[inline]
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    fn lookup(&self, exc: &CfExchange) -> Option<&NodeKey> {
        let values: FieldValues = self.fields.iter().map(|f| f.of_exchange(exc)).collect();
        self.candidates.get(&values)
    }
}

fn join(fields: &[LinkField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

impl Strategy for LinkIterableByFields {
    fn name(&self) -> &str {
        "link_iterable_by_fields"
    }

    fn apply(&self, mut data: Vec<MethodDataset>) -> Result<Vec<MethodDataset>, StrategyError> {
        for exc in data.iter_mut().flat_map(|ds| ds.exchanges.iter_mut()) {
            if exc.is_linked() && !self.relink {
                continue;
            }
            if let Some(key) = self.lookup(exc) {
                exc.input = Some(key.clone());
            }
        }
        Ok(data)
    }
}
