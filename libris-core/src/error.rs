//! Error types for Libris Core

use crate::types::{BookId, ReadSession, SessionAction};
use crate::validation::ValidationErrors;
use thiserror::Error;

/// Result type alias using LibrisError
pub type Result<T> = std::result::Result<T, LibrisError>;

/// Result type for catalog mutations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Top-level error type for all Libris operations
#[derive(Debug, Error)]
pub enum LibrisError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Errors returned by catalog operations.
///
/// Every variant leaves the catalog exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error(transparent)]
    InvalidTransition(#[from] SessionError),
}

impl CatalogError {
    /// The per-field messages, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CatalogError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A reading-session transition requested from the wrong state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot {action} reading while {state}")]
pub struct SessionError {
    pub state: ReadSession,
    pub action: SessionAction,
}

/// Errors produced while importing text for a book body
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not a text file: {0}")]
    NotText(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors produced while exporting a book body
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
