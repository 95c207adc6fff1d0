//! Popularity rankings over a catalog snapshot
//!
//! All rankings order by read count, highest first. Books with the same
//! read count keep their catalog (insertion) order: the sort is stable.

use crate::config::Limits;
use crate::search::contains_ignore_case;
use crate::types::Book;
use serde::{Deserialize, Serialize};

/// Which ranking to compute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "term")]
pub enum RankingQuery {
    Overall,
    Genre(String),
    Author(String),
}

fn top_n<'a>(mut books: Vec<&'a Book>, n: usize) -> Vec<&'a Book> {
    // Vec::sort_by is stable
    books.sort_by(|a, b| b.read_count().cmp(&a.read_count()));
    books.truncate(n);
    books
}

/// The `n` most read books of the whole catalog
pub fn top_overall(books: &[Book], n: usize) -> Vec<&Book> {
    top_n(books.iter().collect(), n)
}

/// The `n` most read books whose genre contains `genre`, ignoring case
pub fn top_by_genre<'a>(books: &'a [Book], genre: &str, n: usize) -> Vec<&'a Book> {
    let genre = genre.to_lowercase();
    top_n(
        books
            .iter()
            .filter(|book| contains_ignore_case(&book.genre, &genre))
            .collect(),
        n,
    )
}

/// The `n` most read books whose author contains `author`, ignoring case
pub fn top_by_author<'a>(books: &'a [Book], author: &str, n: usize) -> Vec<&'a Book> {
    let author = author.to_lowercase();
    top_n(
        books
            .iter()
            .filter(|book| contains_ignore_case(&book.author, &author))
            .collect(),
        n,
    )
}

/// Run a ranking query with the configured size limits
pub fn rank<'a>(books: &'a [Book], query: &RankingQuery, limits: &Limits) -> Vec<&'a Book> {
    match query {
        RankingQuery::Overall => top_overall(books, limits.top_overall),
        RankingQuery::Genre(term) => top_by_genre(books, term, limits.top_by_genre),
        RankingQuery::Author(term) => top_by_author(books, term, limits.top_by_author),
    }
}
