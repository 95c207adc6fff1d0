//! Catalog record types

mod book;
mod draft;
mod session;

pub use book::{Book, BookId};
pub use draft::BookDraft;
pub use session::{ReadSession, SessionAction};
