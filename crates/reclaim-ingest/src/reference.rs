//! Reference collection loading from a tabular CSV source.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use reclaim_model::{MalformedInputError, ReferenceRecord};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Column names of the reference CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    /// Full plain text (required).
    pub text: String,
    /// Markup variant (optional column).
    pub html: String,
    /// Source locator (required).
    pub source_url: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            text: "Question".to_string(),
            html: "Question_html".to_string(),
            source_url: "URL".to_string(),
        }
    }
}

/// Loads the reference collection from `path`.
///
/// Header names are matched exactly after stripping a UTF-8 BOM. The text
/// and source columns must be present; the markup column may be absent, in
/// which case every record has `html: None`. Rows with an empty text cell
/// are skipped since nothing can match them.
pub fn load_reference_csv(path: &Path, columns: &ReferenceColumns) -> Result<Vec<ReferenceRecord>> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let text_idx = position(&columns.text).ok_or_else(|| {
        MalformedInputError::missing_field(path.display().to_string(), &columns.text)
    })?;
    let url_idx = position(&columns.source_url).ok_or_else(|| {
        MalformedInputError::missing_field(path.display().to_string(), &columns.source_url)
    })?;
    let html_idx = position(&columns.html);
    if html_idx.is_none() {
        tracing::warn!(
            path = %path.display(),
            column = %columns.html,
            "reference source has no markup column; resolved records will carry no html"
        );
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| csv_error(path, &e))?;
        let row_number = idx as u64 + 1;
        let cell = |i: usize| row.get(i).map(str::trim).unwrap_or_default();

        let text = cell(text_idx);
        if text.is_empty() {
            skipped += 1;
            continue;
        }
        let html = html_idx
            .map(cell)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        records.push(ReferenceRecord {
            text: text.to_string(),
            html,
            source_url: cell(url_idx).to_string(),
            row: row_number,
        });
    }

    if skipped > 0 {
        tracing::debug!(path = %path.display(), skipped, "skipped reference rows with empty text");
    }
    tracing::info!(path = %path.display(), records = records.len(), "loaded reference collection");
    Ok(records)
}

fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
