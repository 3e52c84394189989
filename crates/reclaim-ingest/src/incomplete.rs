//! Incomplete record loading from a JSON document.

use std::path::Path;

use reclaim_model::{IncompleteRecord, MalformedInputError};
use serde_json::Value;

use crate::error::{IngestError, Result};

/// Loads incomplete records from a JSON array at `path`.
///
/// Each element must be an object with a non-empty string `id` and a string
/// `questionText` (or `truncatedText`). Unknown fields are preserved on the
/// record so they can be written back unchanged.
pub fn load_incomplete_json(path: &Path) -> Result<Vec<IncompleteRecord>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::open(path, e))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_incomplete(&path.display().to_string(), value).map_err(|err| match err {
        ParseError::Malformed(err) => IngestError::MalformedInput(err),
        ParseError::Json(source) => IngestError::Json {
            path: path.to_path_buf(),
            source,
        },
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded incomplete records");
    Ok(records)
}

enum ParseError {
    Malformed(MalformedInputError),
    Json(serde_json::Error),
}

fn parse_incomplete(input: &str, value: Value) -> std::result::Result<Vec<IncompleteRecord>, ParseError> {
    let Value::Array(items) = value else {
        return Err(ParseError::Malformed(MalformedInputError::empty(input)));
    };
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let label = format!("{input}[{idx}]");
        check_required(&label, &item).map_err(ParseError::Malformed)?;
        let record: IncompleteRecord = serde_json::from_value(item).map_err(ParseError::Json)?;
        records.push(record);
    }
    Ok(records)
}

fn check_required(label: &str, item: &Value) -> std::result::Result<(), MalformedInputError> {
    let has_id = item
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty());
    if !has_id {
        return Err(MalformedInputError::missing_field(label, "id"));
    }
    let has_text = IncompleteRecord::TEXT_FIELDS
        .iter()
        .any(|field| item.get(*field).is_some_and(Value::is_string));
    if !has_text {
        return Err(MalformedInputError::missing_field(
            label,
            IncompleteRecord::TEXT_FIELDS[0],
        ));
    }
    Ok(())
}
