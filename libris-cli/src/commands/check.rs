//! Check command implementation

use anyhow::{bail, Result};
use libris_core::{validate_record, BookDraft, ValidationMode};

/// Validate a candidate book, printing one line per failing field
pub fn check(draft: &BookDraft, edit: bool, json: bool) -> Result<()> {
    let mode = if edit {
        ValidationMode::Edit
    } else {
        ValidationMode::Create
    };

    let errors = validate_record(draft, mode);
    if json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else if errors.is_empty() {
        println!("ok");
    } else {
        for (field, message) in errors.iter() {
            println!("{}: {}", field, message);
        }
    }

    if !errors.is_empty() {
        bail!("Validation failed with {} error(s)", errors.len());
    }
    Ok(())
}
