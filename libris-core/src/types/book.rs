//! The Book record held by the catalog

use crate::error::SessionError;
use crate::types::{ReadSession, SessionAction};
use crate::validation::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a book, assigned once when the book is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A book in the catalog.
///
/// Books are only created and mutated by the catalog store. Values handed
/// out by a snapshot are copies, so changing one never reaches the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Book {
    id: BookId,

    /// Title, trimmed, 1-50 characters
    pub name: String,

    /// Author, trimmed, 1-50 characters
    pub author: String,

    /// Genre, trimmed, 1-50 characters
    pub genre: String,

    /// Publication year in `[0, 2024]`
    pub year: i32,

    /// Book body
    pub text: String,

    /// Optional score in `[1, 5]`
    pub rating: Option<u8>,

    /// Optional review, trimmed, at most 200 characters
    pub review: Option<String>,

    read_count: u64,

    session: ReadSession,

    pub added_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// When the last reading session was finished
    pub last_read_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Build a fresh book from a validated record.
    ///
    /// The record must come from the create path, so `text` is present.
    pub(crate) fn create(record: Record) -> Self {
        let now = Utc::now();
        Self {
            id: BookId::new(),
            name: record.name,
            author: record.author,
            genre: record.genre,
            year: record.year,
            text: record.text.unwrap_or_default(),
            rating: record.rating,
            review: record.review,
            read_count: 0,
            session: ReadSession::Idle,
            added_at: now,
            updated_at: now,
            last_read_at: None,
        }
    }

    /// Overwrite the editable fields. `id`, `read_count` and `session` are kept.
    pub(crate) fn apply(&mut self, record: Record) {
        self.name = record.name;
        self.author = record.author;
        self.genre = record.genre;
        self.year = record.year;
        if let Some(text) = record.text {
            self.text = text;
        }
        self.rating = record.rating;
        self.review = record.review;
        self.updated_at = Utc::now();
    }

    pub(crate) fn start_reading(&mut self) -> Result<(), SessionError> {
        self.session = self.session.transition(SessionAction::Start)?;
        Ok(())
    }

    /// Completing a session is the only way `read_count` grows.
    pub(crate) fn finish_reading(&mut self) -> Result<(), SessionError> {
        self.session = self.session.transition(SessionAction::Finish)?;
        self.read_count += 1;
        self.last_read_at = Some(Utc::now());
        Ok(())
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    /// Number of completed reading sessions
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    pub fn session(&self) -> ReadSession {
        self.session
    }

    /// File name used when exporting the body: `<name>.txt`
    pub fn export_file_name(&self) -> String {
        format!("{}.txt", self.name)
    }
}
