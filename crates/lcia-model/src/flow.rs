//! Biosphere flow identity
//!
//! A biosphere flow is identified inside a database by its name and its
//! category path. [`FlowKey`] is that identity without the database;
//! [`FlowNode`] is the persisted node, addressed by [`NodeKey`].

use crate::error::ModelError;
use crate::repr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subcompartment value that collapses a category path to its compartment
pub const UNSPECIFIED: &str = "unspecified";

/// Separator between name and category path in generated node codes
pub const CODE_SEPARATOR: &str = "-";

/// Unit given to nodes created during reconciliation
pub const DEFAULT_FLOW_UNIT: &str = "kilogram";

/// Category path of a biosphere flow: `(compartment,)` or
/// `(compartment, subcompartment)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Categories(Vec<String>);

impl Categories {
    /// Single-element path
    #[inline]
    #[must_use]
    pub fn compartment(compartment: impl Into<String>) -> Self {
        Self(vec![compartment.into()])
    }

    /// Two-element path
    #[inline]
    #[must_use]
    pub fn nested(compartment: impl Into<String>, subcompartment: impl Into<String>) -> Self {
        Self(vec![compartment.into(), subcompartment.into()])
    }

    /// Build the path from spreadsheet columns
    ///
    /// A missing or blank subcompartment, or the literal `unspecified`,
    /// yields the single-element path; any other value yields the
    /// two-element path.
    #[must_use]
    pub fn from_columns(compartment: &str, subcompartment: Option<&str>) -> Self {
        match subcompartment {
            None | Some(UNSPECIFIED) => Self::compartment(compartment),
            Some(sub) if sub.trim().is_empty() => Self::compartment(compartment),
            Some(sub) => Self::nested(compartment, sub),
        }
    }

    /// Top-level compartment
    #[inline]
    #[must_use]
    pub fn top(&self) -> &str {
        &self.0[0]
    }

    /// Subcompartment, if the path has one
    #[inline]
    #[must_use]
    pub fn sub(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Number of path elements (1 or 2)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path elements
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Drop the subcompartment, keeping only the compartment
    #[must_use]
    pub fn truncated(&self) -> Self {
        Self::compartment(self.top())
    }
}

impl TryFrom<Vec<String>> for Categories {
    type Error = ModelError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        if parts.is_empty() || parts.len() > 2 {
            return Err(ModelError::InvalidCategoryDepth { depth: parts.len() });
        }
        // An empty subcompartment is an "unspecified" sentinel, only the
        // compartment must be present.
        if parts[0].is_empty() {
            return Err(ModelError::EmptyCategory { index: 0 });
        }
        Ok(Self(parts))
    }
}

impl From<Categories> for Vec<String> {
    fn from(categories: Categories) -> Self {
        categories.0
    }
}

impl fmt::Display for Categories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::tuple(&self.0))
    }
}

/// Identity of a biosphere flow within one database
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    /// Flow name
    pub name: String,
    /// Category path
    pub categories: Categories,
}

impl FlowKey {
    /// Create new flow key
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, categories: Categories) -> Self {
        Self {
            name: name.into(),
            categories,
        }
    }

    /// Deterministic node code: name, separator, rendered category path
    ///
    /// `("Carbon dioxide", ("air",))` becomes `Carbon dioxide-('air',)`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}{}{}", self.name, CODE_SEPARATOR, self.categories)
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.categories)
    }
}

/// Address of a persisted node: database plus code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    /// Database name
    pub database: String,
    /// Node code, unique within the database
    pub code: String,
}

impl NodeKey {
    /// Create new node key
    #[inline]
    #[must_use]
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.code)
    }
}

/// Kind of biosphere node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    /// Release to the environment
    #[default]
    Emission,
    /// Extraction from the environment
    #[serde(rename = "natural resource")]
    NaturalResource,
    /// Inventory indicator
    #[serde(rename = "inventory indicator")]
    InventoryIndicator,
    /// Economic flow
    Economic,
    /// Social flow
    Social,
}

impl FlowType {
    /// Stored string form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emission => "emission",
            Self::NaturalResource => "natural resource",
            Self::InventoryIndicator => "inventory indicator",
            Self::Economic => "economic",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted biosphere node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Owning database
    pub database: String,
    /// Code, unique within the database
    pub code: String,
    /// Flow name
    pub name: String,
    /// Reference unit
    pub unit: String,
    /// Category path
    pub categories: Categories,
    /// Node kind
    #[serde(rename = "type")]
    pub flow_type: FlowType,
}

impl FlowNode {
    /// Emission node for a flow key, with the deterministic code and the
    /// default unit
    #[must_use]
    pub fn emission(database: impl Into<String>, key: &FlowKey) -> Self {
        Self {
            database: database.into(),
            code: key.code(),
            name: key.name.clone(),
            unit: DEFAULT_FLOW_UNIT.to_string(),
            categories: key.categories.clone(),
            flow_type: FlowType::Emission,
        }
    }

    /// Storage address
    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.database.clone(), self.code.clone())
    }

    /// Identity by name and categories
    #[inline]
    #[must_use]
    pub fn flow_key(&self) -> FlowKey {
        FlowKey::new(self.name.clone(), self.categories.clone())
    }
}
