//! # Strict Document Schema
//!
//! Typed mirror of the JSON shape the structuring prompt asks for. The default
//! pipeline never consults it; it is only used when strict validation is
//! switched on, where a model answer that parses as JSON but does not fit this
//! shape is rejected.

use crate::{errors::IngestError, types::StructuredDocument};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSchema {
    pub metadata: DocumentMetadata,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub document_date: Option<String>,
    pub other_dates: Vec<DatedEvent>,
    pub references: References,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedEvent {
    pub date: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct References {
    pub letters: Vec<LetterReference>,
    pub clauses_articles_acts: Vec<LegalReference>,
    pub persons: Vec<PersonReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterReference {
    pub name: String,
    pub page_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalReferenceKind {
    Clause,
    Article,
    Act,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalReference {
    pub reference: String,
    #[serde(rename = "type")]
    pub kind: LegalReferenceKind,
    pub page_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonReference {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub page_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Title,
    Paragraph,
    List,
    Table,
    Figure,
    Header,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub text: String,
    pub page_number: u32,
    /// Block-specific extras, e.g. table HTML or figure bounding boxes.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Checks a structured document against [`DocumentSchema`].
///
/// Returns the typed document on success. On failure every problem found is
/// reported: a shape mismatch stops at serde's first error, date format
/// problems are collected across the whole document.
pub fn validate(document: &StructuredDocument) -> Result<DocumentSchema, IngestError> {
    let typed: DocumentSchema = serde_json::from_value(document.as_value().clone())
        .map_err(|e| IngestError::Schema {
            violations: vec![e.to_string()],
        })?;

    let mut violations = Vec::new();
    if let Some(date) = &typed.metadata.document_date {
        check_date("metadata.document_date", date, &mut violations);
    }
    for (i, dated) in typed.metadata.other_dates.iter().enumerate() {
        check_date(
            &format!("metadata.other_dates[{i}].date"),
            &dated.date,
            &mut violations,
        );
    }

    if violations.is_empty() {
        Ok(typed)
    } else {
        Err(IngestError::Schema { violations })
    }
}

fn check_date(field: &str, value: &str, violations: &mut Vec<String>) {
    if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
        violations.push(format!("{field}: '{value}' is not a YYYY-MM-DD date"));
    }
}
