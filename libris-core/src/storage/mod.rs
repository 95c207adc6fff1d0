//! Text import/export collaborators
//!
//! The catalog never touches files itself. A host picks a [`TextStorage`]
//! backend, imports a body with it before adding or saving a book, and
//! hands it an [`Export`] to save a book's body as `<name>.txt`.

use crate::catalog::CatalogStore;
use crate::error::{ExportError, ImportError};
use crate::types::{Book, BookId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Result type for imports
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Result type for exports
pub type ExportResult<T> = std::result::Result<T, ExportError>;

const BOM: char = '\u{feff}';

/// A book body to be saved under `file_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub text: String,
}

impl Export {
    pub fn from_book(book: &Book) -> Self {
        Self {
            file_name: book.export_file_name(),
            text: book.text.clone(),
        }
    }
}

/// Source of imported book text and sink for exported text
#[async_trait]
pub trait TextStorage: Send + Sync {
    /// Read the full content of a text file
    async fn import(&self, path: &str) -> ImportResult<String>;

    /// Save an export verbatim, returning where it was written
    async fn export(&self, export: &Export) -> ExportResult<String>;
}

/// Export a catalog book through `storage`, returning where it was written
pub async fn export_book(
    storage: &dyn TextStorage,
    catalog: &CatalogStore,
    id: BookId,
) -> crate::Result<String> {
    let export = catalog.export(id)?;
    Ok(storage.export(&export).await?)
}

/// Decode imported bytes as UTF-8 text
fn decode(path: &str, bytes: Vec<u8>) -> ImportResult<String> {
    let text = String::from_utf8(bytes).map_err(|_| ImportError::NotText(path.to_string()))?;
    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Export names must be a plain file name, never a path
fn check_file_name(name: &str) -> ExportResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(ExportError::InvalidFileName(name.to_string())),
    }
}

/// Local filesystem storage rooted at a directory
pub struct LocalTextStorage {
    root: PathBuf,
}

impl LocalTextStorage {
    /// Create a new local storage with the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Safely resolve a path, preventing path traversal
    fn full_path(&self, path: &str) -> ImportResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(ImportError::InvalidPath(path.to_string()));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(ImportError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl TextStorage for LocalTextStorage {
    async fn import(&self, path: &str) -> ImportResult<String> {
        let full_path = self.full_path(path)?;
        let bytes = tokio::fs::read(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImportError::NotFound(path.to_string()),
            _ => ImportError::Backend(e.to_string()),
        })?;
        tracing::debug!("Imported {} bytes from {}", bytes.len(), full_path.display());
        decode(path, bytes)
    }

    async fn export(&self, export: &Export) -> ExportResult<String> {
        check_file_name(&export.file_name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ExportError::Backend(e.to_string()))?;

        let full_path = self.root.join(&export.file_name);
        tokio::fs::write(&full_path, export.text.as_bytes())
            .await
            .map_err(|e| ExportError::Backend(e.to_string()))?;
        tracing::info!("Exported {}", full_path.display());
        Ok(full_path.display().to_string())
    }
}

/// In-memory storage (for testing and embedding)
#[derive(Default)]
pub struct MemoryTextStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryTextStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file that later imports can read
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), bytes.into());
    }

    /// Content of a stored file, if it is valid UTF-8
    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }
}

#[async_trait]
impl TextStorage for MemoryTextStorage {
    async fn import(&self, path: &str) -> ImportResult<String> {
        let bytes = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::NotFound(path.to_string()))?;
        decode(path, bytes)
    }

    async fn export(&self, export: &Export) -> ExportResult<String> {
        self.insert(export.file_name.clone(), export.text.clone());
        Ok(export.file_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, LibrisError};
    use crate::types::BookDraft;

    fn export(name: &str, text: &str) -> Export {
        Export {
            file_name: format!("{}.txt", name),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryTextStorage::new();
        storage.insert("dune.txt", "Arrakis.");
        assert_eq!(storage.import("dune.txt").await.unwrap(), "Arrakis.");
        assert!(matches!(
            storage.import("missing.txt").await,
            Err(ImportError::NotFound(_))
        ));

        let written = storage.export(&export("Emma", "Handsome, clever, and rich")).await.unwrap();
        assert_eq!(written, "Emma.txt");
        assert_eq!(
            storage.get("Emma.txt").as_deref(),
            Some("Handsome, clever, and rich")
        );
    }

    #[tokio::test]
    async fn test_import_rejects_binary() {
        let storage = MemoryTextStorage::new();
        storage.insert("cover.png", vec![0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]);
        assert!(matches!(
            storage.import("cover.png").await,
            Err(ImportError::NotText(_))
        ));
    }

    #[tokio::test]
    async fn test_import_strips_bom() {
        let storage = MemoryTextStorage::new();
        storage.insert("bom.txt", "\u{feff}Hello");
        assert_eq!(storage.import("bom.txt").await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalTextStorage::new(dir.path());
        let text = "Line one\nLine two — ünïcödé\n";

        let written = storage.export(&export("My Book", text)).await.unwrap();
        assert!(written.ends_with("My Book.txt"));
        let on_disk = std::fs::read_to_string(dir.path().join("My Book.txt")).unwrap();
        assert_eq!(on_disk, text);

        assert_eq!(storage.import("My Book.txt").await.unwrap(), text);
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalTextStorage::new(dir.path());

        assert!(matches!(
            storage.import("../etc/passwd").await,
            Err(ImportError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.import("/etc/passwd").await,
            Err(ImportError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.import("").await,
            Err(ImportError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.export(&export("../escape", "x")).await,
            Err(ExportError::InvalidFileName(_))
        ));
        assert!(matches!(
            storage.export(&export("a/b", "x")).await,
            Err(ExportError::InvalidFileName(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_export_keeps_name_verbatim() {
        let mut catalog = CatalogStore::new();
        let id = catalog
            .add(&BookDraft::new("AC/DC", "Murray Engleheart", "Music", "1997").with_text("Riffs"))
            .unwrap();

        let storage = MemoryTextStorage::new();
        let written = export_book(&storage, &catalog, id).await.unwrap();
        assert_eq!(written, "AC/DC.txt");
        assert_eq!(storage.get("AC/DC.txt").as_deref(), Some("Riffs"));
    }

    #[tokio::test]
    async fn test_export_book_errors() {
        let mut catalog = CatalogStore::new();
        let id = catalog
            .add(&BookDraft::new("AC/DC", "Murray Engleheart", "Music", "1997").with_text("Riffs"))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let local = LocalTextStorage::new(dir.path());

        assert!(matches!(
            export_book(&local, &catalog, id).await,
            Err(LibrisError::Export(ExportError::InvalidFileName(_)))
        ));

        let missing = CatalogStore::new();
        assert!(matches!(
            export_book(&local, &missing, id).await,
            Err(LibrisError::Catalog(CatalogError::NotFound(_)))
        ));
    }
}
