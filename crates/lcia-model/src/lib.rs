//! LCIA data model
//!
//! Typed values shared by every stage of the method import.
//!
//! # Overview
//!
//! - **CfRecord**: one reshaped characterization-factor row
//! - **FlowKey**: biosphere flow identity (name + category path)
//! - **FlowNode**: persisted biosphere node with its deterministic code
//! - **Method**: persisted LCIA method, identified by a [`MethodKey`]
//!
//! # Example
//!
//! ```rust
//! use lcia_model::{Categories, FlowKey};
//!
//! let key = FlowKey::new("Carbon dioxide", Categories::from_columns("air", Some("unspecified")));
//! assert_eq!(key.code(), "Carbon dioxide-('air',)");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod flow;
pub mod method;
pub mod record;
pub mod repr;

// Re-exports
pub use error::ModelError;
pub use flow::{
    Categories, FlowKey, FlowNode, FlowType, NodeKey, CODE_SEPARATOR, DEFAULT_FLOW_UNIT,
    UNSPECIFIED,
};
pub use method::{CharacterizationFactor, Method, MethodKey};
pub use record::{CfRecord, UnitsMap};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
