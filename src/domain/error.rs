//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Tree errors represent broken structural invariants.
///
/// Duplicate inserts and removals of absent values are not errors: they are
/// reported as `Ok(false)` and `Ok(())` respectively.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("structural inconsistency: {context}")]
    StructuralInconsistency { context: String },
}

impl TreeError {
    pub fn inconsistency(context: impl Into<String>) -> Self {
        Self::StructuralInconsistency {
            context: context.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
