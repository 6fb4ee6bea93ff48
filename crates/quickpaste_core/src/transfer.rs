//! Export/import of snippet backups (a JSON array of `{id, title, content}`).

use crate::{error::AppError, models::snippet::Snippet};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;

/// Result of merging an import batch into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Serialize snippets as the pretty-printed backup format.
///
/// # Errors
/// Returns an error if JSON encoding fails.
pub fn export_json(snippets: &[Snippet]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(snippets)?)
}

/// Backup file name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("quickpaste_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Parse and validate a backup file. The batch is all-or-nothing.
///
/// Each record needs a truthy `id` (non-empty string, or a number which is
/// kept in its decimal form), a non-empty string `title`, and a `content`
/// key. `null` content imports as empty text; any other non-string content
/// is rejected.
///
/// # Arguments
/// - `raw`: File contents.
/// - `max_content_size`: Largest content accepted for any record.
///
/// # Returns
/// The parsed records in file order.
///
/// # Errors
/// Returns [`AppError::InvalidImport`] describing the first invalid record.
pub fn parse_import(raw: &str, max_content_size: usize) -> Result<Vec<Snippet>, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidImport(format!("not valid JSON: {}", err)))?;
    let Value::Array(items) = value else {
        return Err(AppError::InvalidImport(
            "expected a JSON array of snippets".to_string(),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item, max_content_size))
        .collect()
}

fn parse_record(index: usize, item: &Value, max_content_size: usize) -> Result<Snippet, AppError> {
    let invalid = |what: &str| AppError::InvalidImport(format!("record {}: {}", index, what));
    let Value::Object(fields) = item else {
        return Err(invalid("not an object"));
    };

    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(number)) if number.as_f64() != Some(0.0) => number.to_string(),
        _ => return Err(invalid("missing id")),
    };
    let title = match fields.get("title") {
        Some(Value::String(title)) if !title.is_empty() => title.clone(),
        _ => return Err(invalid("missing title")),
    };
    let content = match fields.get("content") {
        Some(Value::String(content)) => content.clone(),
        Some(Value::Null) => String::new(),
        Some(_) => return Err(invalid("content is not text")),
        None => return Err(invalid("missing content")),
    };
    if content.len() > max_content_size {
        return Err(invalid("content exceeds the size limit"));
    }

    Ok(Snippet { id, title, content })
}

/// Append imported records whose id is not already present.
///
/// Later duplicates inside the batch are skipped too, so ids stay unique.
///
/// # Returns
/// Counts of added and skipped records.
pub fn merge_snippets(existing: &mut Vec<Snippet>, imported: Vec<Snippet>) -> ImportSummary {
    let mut known: HashSet<String> = existing.iter().map(|snippet| snippet.id.clone()).collect();
    let mut summary = ImportSummary::default();
    for snippet in imported {
        if known.insert(snippet.id.clone()) {
            existing.push(snippet);
            summary.added += 1;
        } else {
            summary.skipped += 1;
        }
    }
    summary
}
