//! Table name rules.
//!
//! Table names double as file stems inside the store directory, so they are
//! limited to ASCII letters, digits, and underscores.

use crate::columns::MAPPED_SUFFIX;
use crate::error::{ModelError, Result};

/// Checks that `name` is a legal table name.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ModelError::InvalidTableName(name.to_string()));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ModelError::InvalidTableName(name.to_string()));
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(ModelError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

/// Turns a file stem into a legal table name.
///
/// Non-alphanumeric runs collapse to one underscore; a leading digit gets a
/// `t_` prefix. Falls back to `table` when nothing usable remains.
pub fn sanitize_table_name(raw: &str) -> String {
    let mut safe = String::with_capacity(raw.len());
    let mut last_was_underscore = true;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            safe.push(ch);
            last_was_underscore = false;
        } else if !last_was_underscore {
            safe.push('_');
            last_was_underscore = true;
        }
    }
    if safe.ends_with('_') {
        safe.pop();
    }
    if safe.is_empty() {
        return "table".to_string();
    }
    if safe.starts_with(|ch: char| ch.is_ascii_digit()) {
        safe.insert_str(0, "t_");
    }
    safe
}

/// Name of the table the crosswalk join derives from `table`.
pub fn mapped_table_name(table: &str) -> String {
    format!("{table}{MAPPED_SUFFIX}")
}
