//! Free-text search over a catalog snapshot

use crate::types::Book;

/// Case-insensitive substring test. An empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Books whose name, author or genre contains `term`, ignoring case.
///
/// Matches keep catalog order. An empty term returns the whole catalog.
pub fn search<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    let term = term.to_lowercase();
    books
        .iter()
        .filter(|book| {
            contains_ignore_case(&book.name, &term)
                || contains_ignore_case(&book.author, &term)
                || contains_ignore_case(&book.genre, &term)
        })
        .collect()
}
