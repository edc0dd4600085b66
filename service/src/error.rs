use std::fmt::{Display, Formatter, Result};

use database::database_error::DatabaseError;
use photo_catalog::CatalogError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    PermissionDenied,
    DeletionFailed(String),
    CatalogError(String),
    DbError(String),
    SettingsError(String),
    InvalidInput(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Error::PermissionDenied => write!(f, "Photo library access was not granted"),
            Error::DeletionFailed(message) => write!(f, "Deleting photos failed: {}", message),
            Error::CatalogError(message) => write!(f, "Photo library error: {}", message),
            Error::DbError(message) => write!(f, "Database error: {}", message),
            Error::SettingsError(message) => write!(f, "Settings error: {}", message),
            Error::InvalidInput(message) => write!(f, "Invalid input: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<DatabaseError> for Error {
    fn from(err: DatabaseError) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::AccessDenied => Error::PermissionDenied,
            other => Error::CatalogError(other.to_string()),
        }
    }
}
