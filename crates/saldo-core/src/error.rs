use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),
    #[error("Category `{label}` is still referenced by {entries} entries")]
    CategoryInUse { label: String, entries: usize },
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Corrupt ledger data: {0}")]
    Corrupt(String),
}

impl CoreError {
    /// Returns `true` for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::EntryNotFound(_)
                | CoreError::CategoryNotFound(_)
                | CoreError::BackupNotFound(_)
        )
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::StoreUnavailable(err.to_string())
    }
}
