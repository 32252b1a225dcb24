//! # Ingestion Pipeline
//!
//! The stages that turn a PDF on disk into a structured JSON document:
//!
//! ```text
//! PDF ─ encode ─► base64 ─ OCR ─► transcript ─ structure ─► JSON ─ save ─► <name>_structured.json
//! ```
//!
//! Each stage is usable on its own; [`DocumentProcessor`] chains them for one
//! document at a time.

pub mod encode;
pub mod output;
pub mod pipeline;
pub mod structure;

pub use encode::encode_pdf;
pub use output::OutputWriter;
pub use pipeline::{DocumentProcessor, ProcessorOptions};
pub use structure::Structurer;
