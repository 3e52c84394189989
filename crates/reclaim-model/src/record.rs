//! Record types flowing through a recovery run.
//!
//! None of these are mutated after creation: the matcher reads
//! [`IncompleteRecord`]s and [`ReferenceRecord`]s and produces new
//! [`MatchResult`]s.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::enums::RuleKind;
use crate::error::ModelError;
use crate::ids::RecordId;

/// A full, trusted record from the reference collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Plain full text.
    pub text: String,
    /// Markup variant of the same text, when the source has one.
    pub html: Option<String>,
    /// Locator of the record in its original source.
    pub source_url: String,
    /// Data row number within the reference source (1-based, excluding header).
    pub row: u64,
}

impl ReferenceRecord {
    pub fn new(text: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
            source_url: source_url.into(),
            row: 0,
        }
    }

    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: u64) -> Self {
        self.row = row;
        self
    }
}

/// A record whose stored text was cut short.
///
/// The typed fields are read from the incomplete-record document, and the
/// document object itself is kept as-is. Serialization writes that object
/// back, so an unresolved record leaves the run exactly as it came in:
/// same field names, same `null`s, same untrimmed id.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompleteRecord {
    pub id: RecordId,
    pub truncated_text: String,
    pub module_title: Option<String>,
    document: Map<String, Value>,
}

impl IncompleteRecord {
    /// Field names accepted for the truncated text, in lookup order.
    pub const TEXT_FIELDS: [&'static str; 2] = ["questionText", "truncatedText"];

    pub fn new(id: RecordId, truncated_text: impl Into<String>) -> Self {
        let truncated_text = truncated_text.into();
        let mut document = Map::new();
        document.insert("id".to_string(), Value::from(id.as_str()));
        document.insert(
            Self::TEXT_FIELDS[0].to_string(),
            Value::from(truncated_text.as_str()),
        );
        Self {
            id,
            truncated_text,
            module_title: None,
            document,
        }
    }

    #[must_use]
    pub fn with_module_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.document
            .insert("moduleTitle".to_string(), Value::from(title.as_str()));
        self.module_title = Some(title);
        self
    }

    /// Reads a record from a document object.
    pub fn from_document(document: Map<String, Value>) -> Result<Self, ModelError> {
        let raw_id = document
            .get("id")
            .and_then(Value::as_str)
            .ok_or(ModelError::MissingField("id"))?;
        let id = RecordId::new(raw_id)?;
        let truncated_text = Self::TEXT_FIELDS
            .iter()
            .find_map(|field| document.get(*field).and_then(Value::as_str))
            .ok_or(ModelError::MissingField(Self::TEXT_FIELDS[0]))?
            .to_string();
        let module_title = document
            .get("moduleTitle")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self {
            id,
            truncated_text,
            module_title,
            document,
        })
    }

    /// The original document object.
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// A field of the original document by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }
}

impl Serialize for IncompleteRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IncompleteRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_document(document).map_err(de::Error::custom)
    }
}

/// An accepted resolution of one incomplete record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: RecordId,
    pub resolved_text: String,
    pub resolved_html: Option<String>,
    pub source_url: String,
    /// The truncated text this resolution replaces.
    pub previous_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_title: Option<String>,
    /// Rule that produced the resolution.
    pub rule: RuleKind,
    /// Row of the selected reference record.
    pub reference_row: u64,
    /// Number of distinct reference texts that satisfied `rule`.
    pub candidates: usize,
    /// Set when more than one distinct reference text satisfied `rule`.
    pub needs_review: bool,
}

impl MatchResult {
    /// Builds a result for `record` resolved to `reference` by `rule`.
    pub fn resolve(
        record: &IncompleteRecord,
        reference: &ReferenceRecord,
        rule: RuleKind,
        candidates: usize,
    ) -> Self {
        Self {
            id: record.id.clone(),
            resolved_text: reference.text.clone(),
            resolved_html: reference.html.clone(),
            source_url: reference.source_url.clone(),
            previous_text: record.truncated_text.clone(),
            module_title: record.module_title.clone(),
            rule,
            reference_row: reference.row,
            candidates,
            needs_review: candidates > 1,
        }
    }
}
