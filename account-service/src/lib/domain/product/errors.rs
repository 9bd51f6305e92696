use thiserror::Error;

/// Catalog errors
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("product name is required")]
    EmptyName,

    #[error("product not found: {0}")]
    NotFound(String),

    #[error("product already exists: {0}")]
    NameAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
