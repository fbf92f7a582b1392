use thiserror::Error;
use uuid::Uuid;

use crate::model::CategoryId;

/// Result type with [`Error`] as its error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`RecipeStore`](crate::RecipeStore) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No recipe has the requested id.
    #[error("recipe {0} not found")]
    NotFound(Uuid),
    /// The caller is not the owner of the recipe.
    #[error("recipe {0} belongs to another user")]
    Forbidden(Uuid),
    /// Submitted data was rejected before anything was written.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending input field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The referenced category does not exist.
    #[error("category {0} does not exist")]
    UnknownCategory(CategoryId),
    /// The caller already reviewed this recipe.
    #[error("recipe {0} was already reviewed by this user")]
    AlreadyReviewed(Uuid),
    /// Error reported by the database.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
