//! LCIA import strategies
//!
//! Pluggable, ordered transformations over method datasets.
//!
//! # Core Concepts
//!
//! - [`Strategy`]: named transformation of `Vec<MethodDataset>`
//! - [`NormalizeUnits`]: canonical unit strings
//! - [`SetBiosphereType`]: tag exchanges as biosphere exchanges
//! - [`DropUnspecifiedSubcategories`]: collapse sentinel subcategories
//! - [`LinkIterableByFields`]: resolve exchanges to nodes by field equality
//! - [`FnStrategy`]: closure as a strategy
//! - [`StrategyPipeline`]: ordered composition of strategies
//!
//! # Example
//!
//! ```rust
//! use lcia_store::MemoryProject;
//! use lcia_strategy::{LinkField, StrategyPipeline};
//!
//! let project = MemoryProject::new();
//! let pipeline = StrategyPipeline::lcia(&project, "biosphere3", &LinkField::DEFAULT, false).unwrap();
//! assert_eq!(pipeline.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod biosphere;
mod dataset;
mod link;
mod pipeline;
mod strategy;
mod units;

// Re-exports
pub use biosphere::{DropUnspecifiedSubcategories, SetBiosphereType, UNSPECIFIED_SUBCATEGORIES};
pub use dataset::{separate_methods, CfExchange, ExchangeType, MethodDataset};
pub use link::{LinkField, LinkIterableByFields};
pub use pipeline::StrategyPipeline;
pub use strategy::{FnStrategy, Strategy, StrategyError};
pub use units::{NormalizeUnits, DEFAULT_UNITS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
