use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// The MIME type used when embedding a PDF in a data URI.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A base64 view of a PDF's raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    payload: String,
}

impl EncodedDocument {
    pub(crate) fn new(payload: String) -> Self {
        Self { payload }
    }

    /// The standard, padded base64 payload.
    pub fn as_base64(&self) -> &str {
        &self.payload
    }

    /// The document as an inline `data:application/pdf;base64,...` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{PDF_MIME_TYPE};base64,{}", self.payload)
    }
}

impl fmt::Debug for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedDocument")
            .field("len", &self.payload.len())
            .finish()
    }
}

impl From<String> for EncodedDocument {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

/// The output of the OCR stage.
///
/// `text` is what the structuring stage receives. `raw` keeps the provider's
/// response untouched; nothing in the pipeline interprets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrTranscript {
    pub text: String,
    pub raw: Value,
}

impl OcrTranscript {
    /// A transcript made of plain text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: Value::String(text.clone()),
            text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The JSON produced by the structuring stage.
///
/// This is a thin wrapper around [`serde_json::Value`]: the default pipeline
/// only requires the model output to be valid JSON. See
/// [`crate::schema::validate`] for the strict shape check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredDocument(pub Value);

impl StructuredDocument {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for StructuredDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// The result of one successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionResult {
    pub status: &'static str,
    pub output_path: PathBuf,
    pub content: StructuredDocument,
}

impl IngestionResult {
    pub(crate) fn success(output_path: PathBuf, content: StructuredDocument) -> Self {
        Self {
            status: "success",
            output_path,
            content,
        }
    }
}
