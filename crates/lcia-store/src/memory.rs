//! In-memory project: flow databases and methods
//!
//! Flow databases live in a [`DashMap`] keyed by database name; each entry is
//! a [`FlowTable`] with a code index and an identity index. Holding the entry
//! guard during [`FlowDatabase::ensure_node`] makes it an atomic
//! compare-and-create per database shard.

use crate::error::{StoreError, StoreResult};
use crate::flows::{Ensured, FlowDatabase};
use crate::methods::{MethodStore, WriteSummary};
use dashmap::DashMap;
use lcia_model::{FlowKey, FlowNode, Method, MethodKey};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Serializable image of a whole project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Nodes per database, ordered by code
    pub databases: BTreeMap<String, Vec<FlowNode>>,
    /// Stored methods, ordered by identity
    pub methods: Vec<Method>,
}

/// Nodes of one database
#[derive(Debug, Clone, Default)]
struct FlowTable {
    by_code: BTreeMap<String, FlowNode>,
    by_identity: HashMap<FlowKey, Vec<String>>,
}

impl FlowTable {
    fn find(&self, database: &str, key: &FlowKey) -> StoreResult<Option<&FlowNode>> {
        match self.by_identity.get(key).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([code]) => Ok(self.by_code.get(code)),
            Some(codes) => Err(StoreError::MultipleResults {
                database: database.to_string(),
                key: key.clone(),
                count: codes.len(),
            }),
        }
    }

    fn insert(&mut self, node: FlowNode) -> StoreResult<()> {
        if self.by_code.contains_key(&node.code) {
            return Err(StoreError::DuplicateCode {
                database: node.database,
                code: node.code,
            });
        }
        self.by_identity
            .entry(node.flow_key())
            .or_default()
            .push(node.code.clone());
        self.by_code.insert(node.code.clone(), node);
        Ok(())
    }
}

/// Apply a method batch to a stored map
pub(crate) fn merge_methods(
    stored: &mut BTreeMap<MethodKey, Method>,
    methods: Vec<Method>,
    overwrite: bool,
) -> WriteSummary {
    let mut summary = WriteSummary::default();
    for method in methods {
        let key = method.key.clone();
        if stored.contains_key(&key) {
            if !overwrite {
                summary.conflicts.push(key);
                continue;
            }
            summary.replaced.push(key.clone());
        } else {
            summary.written.push(key.clone());
        }
        stored.insert(key, method);
    }
    summary
}

/// Project held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryProject {
    databases: DashMap<String, FlowTable>,
    methods: RwLock<BTreeMap<MethodKey, Method>>,
}

impl MemoryProject {
    /// Create empty project
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a project from a snapshot
    ///
    /// # Errors
    /// [`StoreError::DuplicateCode`] if a database lists a code twice.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> StoreResult<Self> {
        let project = Self::new();
        for (database, nodes) in snapshot.databases {
            let mut table = FlowTable::default();
            for node in nodes {
                table.insert(node)?;
            }
            project.databases.insert(database, table);
        }
        let methods = snapshot
            .methods
            .into_iter()
            .map(|m| (m.key.clone(), m))
            .collect();
        *project.methods.write() = methods;
        Ok(project)
    }

    /// Current state as a snapshot
    #[must_use]
    pub fn snapshot(&self) -> ProjectSnapshot {
        let databases = self
            .databases
            .iter()
            .map(|entry| {
                (
                    entry.key().clone(),
                    entry.value().by_code.values().cloned().collect(),
                )
            })
            .collect();
        let methods = self.methods.read().values().cloned().collect();
        ProjectSnapshot { databases, methods }
    }

    /// Copy of the stored methods
    pub(crate) fn methods_map(&self) -> BTreeMap<MethodKey, Method> {
        self.methods.read().clone()
    }

    /// Replace the stored methods
    pub(crate) fn replace_methods(&self, methods: BTreeMap<MethodKey, Method>) {
        *self.methods.write() = methods;
    }

    /// Total number of nodes across databases
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.databases.iter().map(|e| e.value().by_code.len()).sum()
    }
}

impl FlowDatabase for MemoryProject {
    fn get_node(&self, database: &str, key: &FlowKey) -> StoreResult<FlowNode> {
        let table = self
            .databases
            .get(database)
            .ok_or_else(|| StoreError::unknown_object(database, key.clone()))?;
        table
            .find(database, key)?
            .cloned()
            .ok_or_else(|| StoreError::unknown_object(database, key.clone()))
    }

    fn create_node(&self, node: FlowNode) -> StoreResult<FlowNode> {
        if !self.databases.contains_key(&node.database) {
            tracing::debug!(database = %node.database, "registering new database");
        }
        let mut table = self.databases.entry(node.database.clone()).or_default();
        table.insert(node.clone())?;
        Ok(node)
    }

    fn nodes(&self, database: &str) -> StoreResult<Vec<FlowNode>> {
        Ok(self
            .databases
            .get(database)
            .map(|t| t.by_code.values().cloned().collect())
            .unwrap_or_default())
    }

    fn databases(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.databases.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn ensure_node(&self, node: FlowNode) -> StoreResult<Ensured> {
        let mut table = self.databases.entry(node.database.clone()).or_default();
        if let Some(existing) = table.find(&node.database, &node.flow_key())? {
            return Ok(Ensured::Existing(existing.clone()));
        }
        table.insert(node.clone())?;
        Ok(Ensured::Created(node))
    }
}

impl MethodStore for MemoryProject {
    fn write_methods(&self, methods: Vec<Method>, overwrite: bool) -> StoreResult<WriteSummary> {
        let mut stored = self.methods.write();
        Ok(merge_methods(&mut stored, methods, overwrite))
    }

    fn get_method(&self, key: &MethodKey) -> StoreResult<Option<Method>> {
        Ok(self.methods.read().get(key).cloned())
    }

    fn method_keys(&self) -> StoreResult<Vec<MethodKey>> {
        Ok(self.methods.read().keys().cloned().collect())
    }
}
