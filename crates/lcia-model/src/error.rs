//! Error types for the LCIA data model

/// Errors raised while constructing model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Category paths hold a compartment and at most one subcompartment
    #[error("category path must have 1 or 2 elements, got {depth}")]
    InvalidCategoryDepth {
        /// Number of elements supplied
        depth: usize,
    },

    /// A category element was empty
    #[error("category path element {index} is empty")]
    EmptyCategory {
        /// Position of the empty element
        index: usize,
    },
}
