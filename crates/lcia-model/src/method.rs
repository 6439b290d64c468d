//! LCIA method identity and persisted method content

use crate::flow::NodeKey;
use crate::repr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Method identity: (method, category, indicator)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodKey(pub String, pub String, pub String);

impl MethodKey {
    /// Create new method key
    #[inline]
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        category: impl Into<String>,
        indicator: impl Into<String>,
    ) -> Self {
        Self(method.into(), category.into(), indicator.into())
    }

    /// Top-level method family
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.0
    }

    /// Impact category
    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.1
    }

    /// Indicator
    #[inline]
    #[must_use]
    pub fn indicator(&self) -> &str {
        &self.2
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::tuple(&[&self.0, &self.1, &self.2]))
    }
}

/// One persisted characterization factor: linked flow and factor value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterizationFactor {
    /// Linked biosphere node
    pub flow: NodeKey,
    /// Factor value
    pub amount: f64,
}

/// Persisted LCIA method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Method identity
    pub key: MethodKey,
    /// Indicator unit
    pub unit: Option<String>,
    /// Free text description
    pub description: String,
    /// Source file the method was imported from
    pub filename: String,
    /// Characterization factors
    pub factors: Vec<CharacterizationFactor>,
}

impl Method {
    /// Number of factors
    #[inline]
    #[must_use]
    pub fn num_cfs(&self) -> usize {
        self.factors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_key_display() {
        let key = MethodKey::new("ReCiPe", "midpoint", "climate change");
        assert_eq!(key.to_string(), "('ReCiPe', 'midpoint', 'climate change')");
        assert_eq!(key.indicator(), "climate change");
    }

    #[test]
    fn method_key_orders_lexicographically() {
        let a = MethodKey::new("A", "x", "1");
        let b = MethodKey::new("A", "y", "0");
        assert!(a < b);
    }
}
