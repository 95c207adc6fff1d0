//! Candidate records submitted for add or save

use crate::error::ImportError;
use crate::types::Book;
use crate::validation::Field;
use serde::{Deserialize, Serialize};

/// Raw, unvalidated input for a book.
///
/// Values are kept exactly as the user typed them; trimming and parsing
/// happen during validation. `None` for `rating`/`review` means the field
/// was left out. `None` for `text` means no content was supplied: the add
/// path rejects that, the edit path keeps the current body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub year: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl BookDraft {
    /// Create a draft with the required fields
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            genre: genre.into(),
            year: year.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.review = Some(review.into());
        self
    }

    /// Raw value of a field as seen by the validation rules
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Author => Some(&self.author),
            Field::Genre => Some(&self.genre),
            Field::Year => Some(&self.year),
            Field::Rating => self.rating.as_deref(),
            Field::Review => self.review.as_deref(),
            Field::Text => self.text.as_deref(),
        }
    }

    /// Replace a single field with user input
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Author => self.author = value,
            Field::Genre => self.genre = value,
            Field::Year => self.year = value,
            Field::Rating => self.rating = Some(value),
            Field::Review => self.review = Some(value),
            Field::Text => self.text = Some(value),
        }
    }

    /// Take the result of a text import as the book body.
    ///
    /// An empty or failed import counts as "no text supplied".
    pub fn apply_import(&mut self, outcome: Result<String, ImportError>) {
        match outcome {
            Ok(text) if !text.is_empty() => self.text = Some(text),
            Ok(_) => {
                tracing::warn!("Imported text is empty");
                self.text = None;
            }
            Err(e) => {
                tracing::warn!("Text import failed: {}", e);
                self.text = None;
            }
        }
    }
}

impl From<&Book> for BookDraft {
    /// Seed an edit form from the stored book. The body is left out so that
    /// saving without a new import keeps it.
    fn from(book: &Book) -> Self {
        Self {
            name: book.name.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year.to_string(),
            rating: book.rating.map(|r| r.to_string()),
            review: book.review.clone(),
            text: None,
        }
    }
}
