//! Directory-backed project
//!
//! State is a single JSON snapshot (`project.json`) inside the project
//! directory. Snapshots are written to a temporary file in the same
//! directory and renamed over the previous one.

use crate::error::{StoreError, StoreResult};
use crate::flows::{Ensured, FlowDatabase};
use crate::memory::{merge_methods, MemoryProject, ProjectSnapshot};
use crate::methods::{MethodStore, WriteSummary};
use lcia_model::{FlowKey, FlowNode, Method, MethodKey};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Snapshot file name inside a project directory
pub const SNAPSHOT_FILE: &str = "project.json";

/// Project persisted as a JSON snapshot in a directory
///
/// Node creation marks the project dirty and is made durable by
/// [`FlowDatabase::flush`]; method writes are durable when they return.
#[derive(Debug)]
pub struct FileProject {
    root: PathBuf,
    inner: MemoryProject,
    dirty: AtomicBool,
    persist_lock: Mutex<()>,
}

impl FileProject {
    /// Open a project directory, creating it when missing
    ///
    /// # Errors
    /// IO failures and undecodable snapshots.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::io_error(&root, e))?;

        let path = root.join(SNAPSHOT_FILE);
        let inner = if path.exists() {
            let bytes = std::fs::read(&path).map_err(|e| StoreError::io_error(&path, e))?;
            let snapshot: ProjectSnapshot = serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            MemoryProject::from_snapshot(snapshot)?
        } else {
            MemoryProject::new()
        };

        tracing::debug!(path = %root.display(), nodes = inner.node_count(), "opened project");
        Ok(Self {
            root,
            inner,
            dirty: AtomicBool::new(false),
            persist_lock: Mutex::new(()),
        })
    }

    /// Project directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file
    #[inline]
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    fn write_snapshot(&self, snapshot: &ProjectSnapshot) -> StoreResult<()> {
        let path = self.snapshot_path();
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(StoreError::Encode)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| StoreError::io_error(&self.root, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io_error(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io_error(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::io_error(&path, e.error))?;
        Ok(())
    }
}

impl FlowDatabase for FileProject {
    fn get_node(&self, database: &str, key: &FlowKey) -> StoreResult<FlowNode> {
        self.inner.get_node(database, key)
    }

    fn create_node(&self, node: FlowNode) -> StoreResult<FlowNode> {
        let node = self.inner.create_node(node)?;
        self.dirty.store(true, Ordering::Release);
        Ok(node)
    }

    fn nodes(&self, database: &str) -> StoreResult<Vec<FlowNode>> {
        self.inner.nodes(database)
    }

    fn databases(&self) -> StoreResult<Vec<String>> {
        self.inner.databases()
    }

    fn ensure_node(&self, node: FlowNode) -> StoreResult<Ensured> {
        let ensured = self.inner.ensure_node(node)?;
        if ensured.created() {
            self.dirty.store(true, Ordering::Release);
        }
        Ok(ensured)
    }

    fn flush(&self) -> StoreResult<()> {
        let _guard = self.persist_lock.lock();
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        let result = self.write_snapshot(&self.inner.snapshot());
        if result.is_err() {
            self.dirty.store(true, Ordering::Release);
        }
        result
    }
}

impl MethodStore for FileProject {
    fn write_methods(&self, methods: Vec<Method>, overwrite: bool) -> StoreResult<WriteSummary> {
        let _guard = self.persist_lock.lock();

        let mut staged = self.inner.methods_map();
        let summary = merge_methods(&mut staged, methods, overwrite);
        if summary.committed() == 0 && !self.dirty.load(Ordering::Acquire) {
            return Ok(summary);
        }

        let mut snapshot = self.inner.snapshot();
        snapshot.methods = staged.values().cloned().collect();
        self.write_snapshot(&snapshot)?;

        self.inner.replace_methods(staged);
        self.dirty.store(false, Ordering::Release);
        Ok(summary)
    }

    fn get_method(&self, key: &MethodKey) -> StoreResult<Option<Method>> {
        self.inner.get_method(key)
    }

    fn method_keys(&self) -> StoreResult<Vec<MethodKey>> {
        self.inner.method_keys()
    }
}
