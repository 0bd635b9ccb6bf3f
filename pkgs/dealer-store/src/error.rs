use thiserror::Error;

use crate::backend::{BackendKind, Collection};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} backend unavailable: {reason}")]
    BackendUnavailable { backend: BackendKind, reason: String },

    #[error("Duplicate {field} '{value}' in {collection}")]
    ConstraintViolation {
        collection: Collection,
        field: String,
        value: String,
    },

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("Store not initialized")]
    NotInitialized,
}

impl StoreError {
    pub fn unavailable(backend: BackendKind, reason: impl ToString) -> Self {
        Self::BackendUnavailable {
            backend,
            reason: reason.to_string(),
        }
    }

    /// A second record with an id already in use
    pub fn duplicate_id(collection: Collection, id: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            collection,
            field: "id".to_string(),
            value: id.into(),
        }
    }

    /// True for failures of the medium itself, as opposed to bad input.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
