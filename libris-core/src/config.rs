//! Catalog configuration

use serde::{Deserialize, Serialize};

/// Default number of entries in the overall and genre rankings
pub const DEFAULT_TOP: usize = 10;

/// Default number of entries in a per-author ranking
pub const DEFAULT_TOP_BY_AUTHOR: usize = 3;

/// Size limits for the ranking views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub top_overall: usize,
    pub top_by_genre: usize,
    pub top_by_author: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            top_overall: DEFAULT_TOP,
            top_by_genre: DEFAULT_TOP,
            top_by_author: DEFAULT_TOP_BY_AUTHOR,
        }
    }
}
