//! The in-memory book catalog

use crate::error::{CatalogError, CatalogResult};
use crate::storage::Export;
use crate::types::{Book, BookDraft, BookId};
use crate::validation::{self, ValidationMode};
use std::collections::HashMap;

/// Ordered collection of books.
///
/// Insertion order is the display order and the ranking tie-break. Every
/// write is validated first; a failed operation leaves the catalog as it was.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    books: Vec<Book>,
    /// Position of each book in `books`. Books are never removed, so
    /// positions stay valid for the lifetime of the store.
    positions: HashMap<BookId, usize>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a candidate and append it as a new book
    pub fn add(&mut self, draft: &BookDraft) -> CatalogResult<BookId> {
        let record = validation::check(draft, ValidationMode::Create).map_err(|errors| {
            tracing::warn!("Rejected new book: {}", errors);
            CatalogError::Validation(errors)
        })?;

        let book = Book::create(record);
        let id = book.id();
        tracing::info!(book_id = %id, "Added '{}' by {}", book.name, book.author);

        self.positions.insert(id, self.books.len());
        self.books.push(book);
        Ok(id)
    }

    /// Validate a candidate and overwrite an existing book with it.
    ///
    /// `id`, the read count and the reading session are never touched. A
    /// draft without text keeps the stored body.
    pub fn save(&mut self, id: BookId, draft: &BookDraft) -> CatalogResult<()> {
        let book = self.book_mut(id)?;
        let record = validation::check(draft, ValidationMode::Edit).map_err(|errors| {
            tracing::warn!(book_id = %id, "Rejected edit: {}", errors);
            CatalogError::Validation(errors)
        })?;

        book.apply(record);
        tracing::debug!(book_id = %id, "Saved '{}'", book.name);
        Ok(())
    }

    /// Move a book from `Idle` to `Reading`
    pub fn start_reading(&mut self, id: BookId) -> CatalogResult<()> {
        let book = self.book_mut(id)?;
        book.start_reading()?;
        tracing::debug!(book_id = %id, "Started reading '{}'", book.name);
        Ok(())
    }

    /// Move a book from `Reading` back to `Idle`, counting one more read
    pub fn finish_reading(&mut self, id: BookId) -> CatalogResult<()> {
        let book = self.book_mut(id)?;
        book.finish_reading()?;
        tracing::info!(
            book_id = %id,
            read_count = book.read_count(),
            "Finished reading '{}'",
            book.name
        );
        Ok(())
    }

    /// Copy of every book in insertion order
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.positions.get(&id).map(|&pos| &self.books[pos])
    }

    /// Books in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.iter().map(Book::id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Name and body of a book, ready to hand to a text storage
    pub fn export(&self, id: BookId) -> CatalogResult<Export> {
        self.get(id)
            .map(Export::from_book)
            .ok_or(CatalogError::NotFound(id))
    }

    fn book_mut(&mut self, id: BookId) -> CatalogResult<&mut Book> {
        match self.positions.get(&id) {
            Some(&pos) => Ok(&mut self.books[pos]),
            None => Err(CatalogError::NotFound(id)),
        }
    }
}
