//! Libris Core Library
//!
//! This crate provides the in-memory book catalog: field validation, the
//! catalog store with its per-book reading sessions, free-text search and
//! popularity rankings. Text import and export go through the
//! [`storage::TextStorage`] seam so the catalog itself performs no I/O.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ranking;
pub mod search;
pub mod shared;
pub mod storage;
pub mod types;
pub mod validation;

pub use catalog::CatalogStore;
pub use config::Limits;
pub use error::{
    CatalogError, CatalogResult, ExportError, ImportError, LibrisError, Result, SessionError,
};
pub use ranking::{rank, top_by_author, top_by_genre, top_overall, RankingQuery};
pub use search::search;
pub use shared::SharedCatalog;
pub use storage::{export_book, Export, LocalTextStorage, MemoryTextStorage, TextStorage};
pub use types::{Book, BookDraft, BookId, ReadSession, SessionAction};
pub use validation::{
    validate_field, validate_named_field, validate_record, Field, ValidationErrors,
    ValidationMode,
};
