//! Biosphere flow database contract
//!
//! Provides the [`FlowDatabase`] trait consumed by reconciliation and by the
//! link strategy.

use crate::error::{StoreError, StoreResult};
use lcia_model::{FlowKey, FlowNode};

/// Outcome of [`FlowDatabase::ensure_node`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ensured {
    /// A node with the same name and categories was already present
    Existing(FlowNode),
    /// The node was created
    Created(FlowNode),
}

impl Ensured {
    /// Whether the node was created by this call
    #[inline]
    #[must_use]
    pub fn created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The stored node
    #[inline]
    #[must_use]
    pub fn node(&self) -> &FlowNode {
        match self {
            Self::Existing(node) | Self::Created(node) => node,
        }
    }
}

/// Graph database holding biosphere flow nodes
pub trait FlowDatabase: Send + Sync {
    /// Look up a node by name and category path
    ///
    /// # Errors
    /// [`StoreError::UnknownObject`] when absent,
    /// [`StoreError::MultipleResults`] when ambiguous.
    fn get_node(&self, database: &str, key: &FlowKey) -> StoreResult<FlowNode>;

    /// Create a node, registering its database if needed
    ///
    /// # Errors
    /// [`StoreError::DuplicateCode`] if the code is taken.
    fn create_node(&self, node: FlowNode) -> StoreResult<FlowNode>;

    /// All nodes of a database; empty for an unknown database
    fn nodes(&self, database: &str) -> StoreResult<Vec<FlowNode>>;

    /// Registered database names
    fn databases(&self) -> StoreResult<Vec<String>>;

    /// Create the node unless one with the same name and categories exists
    ///
    /// The default is check-then-create. Two callers racing on the same key
    /// can both miss the lookup; the loser then fails with
    /// [`StoreError::DuplicateCode`]. Implementations that can, should
    /// override this with an atomic compare-and-create.
    fn ensure_node(&self, node: FlowNode) -> StoreResult<Ensured> {
        match self.get_node(&node.database, &node.flow_key()) {
            Ok(existing) => Ok(Ensured::Existing(existing)),
            Err(StoreError::UnknownObject { .. }) => self.create_node(node).map(Ensured::Created),
            Err(e) => Err(e),
        }
    }

    /// Make pending changes durable
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}
