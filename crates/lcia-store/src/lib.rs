//! LCIA storage
//!
//! Flow databases and method storage behind two traits, with an in-memory
//! implementation and a directory-backed one.
//!
//! # Overview
//!
//! - **FlowDatabase**: lookup and creation of biosphere nodes
//! - **MethodStore**: batch persistence of LCIA methods
//! - **MemoryProject**: both traits over `DashMap`/`RwLock`
//! - **FileProject**: `MemoryProject` persisted as a JSON snapshot
//!
//! # Example
//!
//! ```rust
//! use lcia_model::{Categories, FlowKey, FlowNode};
//! use lcia_store::{FlowDatabase, MemoryProject};
//!
//! let project = MemoryProject::new();
//! let key = FlowKey::new("Carbon dioxide", Categories::compartment("air"));
//!
//! let ensured = project.ensure_node(FlowNode::emission("biosphere3", &key)).unwrap();
//! assert!(ensured.created());
//! assert!(project.get_node("biosphere3", &key).is_ok());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod flows;
pub mod memory;
pub mod methods;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use file::{FileProject, SNAPSHOT_FILE};
pub use flows::{Ensured, FlowDatabase};
pub use memory::{MemoryProject, ProjectSnapshot};
pub use methods::{MethodStore, WriteSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
