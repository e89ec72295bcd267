/// Errors that can occur within the storage layer.
///
/// # Examples
///
/// ```rust
/// use railplan_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "train",
///     id: "TRN-099".to_string(),
/// };
/// assert!(err.to_string().contains("TRN-099"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// An underlying database error.
    #[error("Storage: database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// A column held a value the domain types cannot represent.
    #[error("Storage: invalid value in column '{column}': {reason}")]
    InvalidColumn {
        column: &'static str,
        reason: String,
    },

    /// Could not prepare the local data directory.
    #[error("Storage: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
