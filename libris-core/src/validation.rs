//! Field and record validation for book input
//!
//! Every constrained field has exactly one rule in the `RULES` table. Single-field
//! checks (run on each keystroke by a form) and whole-record checks (run
//! before a write) both evaluate that same table.

use crate::types::BookDraft;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of name, author and genre (characters, after trimming)
pub const MAX_LABEL_LEN: usize = 50;

/// Maximum length of a review (characters, after trimming)
pub const MAX_REVIEW_LEN: usize = 200;

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 2024;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A constrained book field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Author,
    Genre,
    Year,
    Rating,
    Review,
    Text,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Author,
        Field::Genre,
        Field::Year,
        Field::Rating,
        Field::Review,
        Field::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Author => "author",
            Field::Genre => "genre",
            Field::Year => "year",
            Field::Rating => "rating",
            Field::Review => "review",
            Field::Text => "text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field name that has no validation rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Which write path a record is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Adding a new book: the body text is required
    Create,
    /// Saving an existing book: a missing body keeps the stored one
    Edit,
}

impl ValidationMode {
    /// Fields checked by a whole-record validation in this mode
    pub fn fields(self) -> &'static [Field] {
        match self {
            ValidationMode::Create => CREATE_FIELDS,
            ValidationMode::Edit => EDIT_FIELDS,
        }
    }
}

const CREATE_FIELDS: &[Field] = &Field::ALL;

const EDIT_FIELDS: &[Field] = &[
    Field::Name,
    Field::Author,
    Field::Genre,
    Field::Year,
    Field::Rating,
    Field::Review,
];

struct Rule {
    field: Field,
    message: &'static str,
    check: fn(Option<&str>) -> bool,
}

static RULES: [Rule; 7] = [
    Rule {
        field: Field::Name,
        message: "Name must be between 1 and 50 characters",
        check: is_label,
    },
    Rule {
        field: Field::Author,
        message: "Author must be between 1 and 50 characters",
        check: is_label,
    },
    Rule {
        field: Field::Genre,
        message: "Genre must be between 1 and 50 characters",
        check: is_label,
    },
    Rule {
        field: Field::Year,
        message: "Year must be a whole number between 0 and 2024",
        check: |v| v.and_then(parse_year).is_some(),
    },
    Rule {
        field: Field::Rating,
        message: "Rating must be a whole number between 1 and 5",
        check: |v| match present(v) {
            Some(s) => parse_rating(s).is_some(),
            None => true,
        },
    },
    Rule {
        field: Field::Review,
        message: "Review must be at most 200 characters",
        check: |v| v.map_or(true, |s| char_len(s) <= MAX_REVIEW_LEN),
    },
    Rule {
        field: Field::Text,
        message: "Book text is required",
        check: |v| v.is_some_and(|s| !s.is_empty()),
    },
];

fn rule_for(field: Field) -> &'static Rule {
    // RULES is declared in Field order
    let rule = &RULES[field as usize];
    debug_assert_eq!(rule.field, field);
    rule
}

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn is_label(v: Option<&str>) -> bool {
    v.is_some_and(|s| (1..=MAX_LABEL_LEN).contains(&char_len(s)))
}

/// Non-blank optional input
fn present(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_year(s: &str) -> Option<i32> {
    s.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
}

fn parse_rating(s: &str) -> Option<u8> {
    s.trim()
        .parse::<u8>()
        .ok()
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
}

/// Check a single field value.
///
/// Returns the error message, or `None` when the value is acceptable.
pub fn validate_field(field: Field, value: Option<&str>) -> Option<&'static str> {
    let rule = rule_for(field);
    if (rule.check)(value) {
        None
    } else {
        Some(rule.message)
    }
}

/// Check a single field addressed by its name (`"name"`, `"year"`, ...)
pub fn validate_named_field(
    name: &str,
    value: Option<&str>,
) -> Result<Option<&'static str>, UnknownField> {
    Ok(validate_field(name.parse()?, value))
}

/// Check every field the given write path constrains.
///
/// The candidate is acceptable iff the returned map is empty.
pub fn validate_record(draft: &BookDraft, mode: ValidationMode) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for &field in mode.fields() {
        if let Some(message) = validate_field(field, draft.value(field)) {
            errors.insert(field, message);
        }
    }
    errors
}

/// A draft that passed validation, normalised for storage
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub text: Option<String>,
}

/// Validate and normalise a draft in one step
pub(crate) fn check(draft: &BookDraft, mode: ValidationMode) -> Result<Record, ValidationErrors> {
    let errors = validate_record(draft, mode);
    let year = match parse_year(&draft.year) {
        Some(year) if errors.is_empty() => year,
        _ => return Err(errors),
    };

    Ok(Record {
        name: draft.name.trim().to_string(),
        author: draft.author.trim().to_string(),
        genre: draft.genre.trim().to_string(),
        year,
        rating: present(draft.rating.as_deref()).and_then(parse_rating),
        review: present(draft.review.as_deref()).map(str::to_string),
        text: draft.text.clone().filter(|text| !text.is_empty()),
    })
}

/// Per-field validation messages, ordered by field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub(crate) fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> BookDraft {
        BookDraft::new("Dune", "Frank Herbert", "SF", "1965").with_text("Arrakis.")
    }

    #[test]
    fn test_rules_follow_field_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(RULES[i].field, *field);
        }
    }

    #[test]
    fn test_validate_labels() {
        assert!(validate_field(Field::Name, Some("Dune")).is_none());
        assert!(validate_field(Field::Name, Some("")).is_some());
        assert!(validate_field(Field::Name, Some("   ")).is_some());
        assert!(validate_field(Field::Author, Some(&"a".repeat(50))).is_none());
        assert!(validate_field(Field::Author, Some(&"a".repeat(51))).is_some());
        // Surrounding whitespace does not count towards the limit
        assert!(validate_field(Field::Genre, Some(&format!("  {}  ", "g".repeat(50)))).is_none());
        // Length is counted in characters, not bytes
        assert!(validate_field(Field::Name, Some(&"é".repeat(50))).is_none());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_field(Field::Year, Some("0")).is_none());
        assert!(validate_field(Field::Year, Some("2024")).is_none());
        assert!(validate_field(Field::Year, Some(" 1999 ")).is_none());
        assert!(validate_field(Field::Year, Some("2025")).is_some());
        assert!(validate_field(Field::Year, Some("-1")).is_some());
        assert!(validate_field(Field::Year, Some("nineteen")).is_some());
        assert!(validate_field(Field::Year, Some("19.5")).is_some());
        assert!(validate_field(Field::Year, Some("")).is_some());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_field(Field::Rating, None).is_none());
        assert!(validate_field(Field::Rating, Some("")).is_none());
        assert!(validate_field(Field::Rating, Some("1")).is_none());
        assert!(validate_field(Field::Rating, Some("5")).is_none());
        assert!(validate_field(Field::Rating, Some("0")).is_some());
        assert!(validate_field(Field::Rating, Some("6")).is_some());
        assert!(validate_field(Field::Rating, Some("five")).is_some());
    }

    #[test]
    fn test_validate_review() {
        assert!(validate_field(Field::Review, None).is_none());
        assert!(validate_field(Field::Review, Some(&"r".repeat(200))).is_none());
        assert!(validate_field(Field::Review, Some(&"r".repeat(201))).is_some());
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_field(Field::Text, Some("body")).is_none());
        assert!(validate_field(Field::Text, Some("")).is_some());
        assert!(validate_field(Field::Text, None).is_some());
    }

    #[test]
    fn test_validate_named_field() {
        assert_eq!(validate_named_field("year", Some("1999")), Ok(None));
        assert!(validate_named_field("YEAR", Some("3000")).unwrap().is_some());
        assert_eq!(
            validate_named_field("isbn", Some("x")),
            Err(UnknownField("isbn".to_string()))
        );
    }

    #[test]
    fn test_validate_record_create_requires_text() {
        let mut draft = valid_draft();
        assert!(validate_record(&draft, ValidationMode::Create).is_empty());

        draft.text = None;
        let errors = validate_record(&draft, ValidationMode::Create);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Text), Some("Book text is required"));

        assert!(validate_record(&draft, ValidationMode::Edit).is_empty());
    }

    #[test]
    fn test_validate_record_collects_every_field() {
        let draft = BookDraft::new("", "", "SF", "2099")
            .with_rating("9")
            .with_text("t");
        let errors = validate_record(&draft, ValidationMode::Create);
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![Field::Name, Field::Author, Field::Year, Field::Rating]
        );
        assert_eq!(
            errors.to_string(),
            "name: Name must be between 1 and 50 characters; \
             author: Author must be between 1 and 50 characters; \
             year: Year must be a whole number between 0 and 2024; \
             rating: Rating must be a whole number between 1 and 5"
        );
    }

    #[test]
    fn test_check_normalises() {
        let draft = BookDraft::new("  Dune ", " Frank Herbert", "SF  ", " 1965")
            .with_rating(" 4 ")
            .with_review("   ")
            .with_text("  Arrakis.  ");
        let record = check(&draft, ValidationMode::Create).unwrap();
        assert_eq!(record.name, "Dune");
        assert_eq!(record.author, "Frank Herbert");
        assert_eq!(record.genre, "SF");
        assert_eq!(record.year, 1965);
        assert_eq!(record.rating, Some(4));
        assert_eq!(record.review, None);
        // Body text is stored verbatim
        assert_eq!(record.text.as_deref(), Some("  Arrakis.  "));
    }

    #[test]
    fn test_errors_serialize_as_map() {
        let draft = BookDraft::new("", "X", "Y", "1999").with_text("t");
        let errors = validate_record(&draft, ValidationMode::Create);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Name must be between 1 and 50 characters" })
        );
    }
}
