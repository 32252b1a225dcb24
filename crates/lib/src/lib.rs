//! # docstruct
//!
//! Turns PDF documents into structured JSON. A PDF is base64-encoded and sent
//! to an OCR service; the transcript is handed to a chat-completion model with
//! a fixed prompt that asks for a document schema of metadata, dates,
//! cross-references and typed content blocks; the model's JSON answer is saved
//! next to the other outputs and returned.
//!
//! The upstream services sit behind the [`providers::ocr::OcrProvider`] and
//! [`providers::ai::AiProvider`] traits. [`ingest::DocumentProcessor`] wires
//! them together.

pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod schema;
pub mod types;

pub use errors::{IngestError, ProviderError};
pub use ingest::{DocumentProcessor, OutputWriter, ProcessorOptions, Structurer};
pub use providers::retry::RetryPolicy;
pub use types::{EncodedDocument, IngestionResult, OcrTranscript, StructuredDocument};
