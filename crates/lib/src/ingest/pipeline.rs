//! Orchestration of one document through every ingestion stage.

use crate::{
    errors::IngestError,
    ingest::{encode::encode_pdf, output::OutputWriter, structure::Structurer},
    providers::{ai::AiProvider, ocr::OcrProvider, retry::RetryPolicy},
    schema,
    types::IngestionResult,
};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Behavior switches for [`DocumentProcessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorOptions {
    /// Reject model output that does not match the document schema.
    pub strict_validation: bool,
    /// Retry policy applied to both upstream calls.
    pub retry: RetryPolicy,
}

/// Runs a PDF through encode, OCR, structure and save.
///
/// The processor owns its adapters, which are built once and reused for every
/// document. It keeps no per-document state, so one instance can serve
/// concurrent requests.
#[derive(Clone, Debug)]
pub struct DocumentProcessor {
    ocr_provider: Box<dyn OcrProvider>,
    structurer: Structurer,
    writer: OutputWriter,
    options: ProcessorOptions,
}

impl DocumentProcessor {
    pub fn new(
        ocr_provider: Box<dyn OcrProvider>,
        ai_provider: Box<dyn AiProvider>,
        writer: OutputWriter,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            ocr_provider,
            structurer: Structurer::new(ai_provider).with_retry(options.retry),
            writer,
            options,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Processes the PDF at `pdf_path`.
    ///
    /// `source_name` is the document's original file name; the output file is
    /// named after it, not after `pdf_path`. Nothing is written unless every
    /// stage before saving succeeded.
    #[instrument(skip(self, pdf_path), fields(path = %pdf_path.as_ref().display()))]
    pub async fn process(
        &self,
        pdf_path: impl AsRef<Path>,
        source_name: &str,
    ) -> Result<IngestionResult, IngestError> {
        let start = Instant::now();
        let pdf_path = pdf_path.as_ref();

        // ── Step 1: Encode ───────────────────────────────────────────────────
        let encoded = encode_pdf(pdf_path).await?;

        // ── Step 2: OCR ──────────────────────────────────────────────────────
        let transcript = self
            .options
            .retry
            .run("ocr", || self.ocr_provider.run_ocr(&encoded))
            .await
            .map_err(|e| {
                error!("OCR failed for '{source_name}': {e}");
                IngestError::Upstream(e)
            })?;
        info!("OCR produced {} chars of text.", transcript.text.len());

        // ── Step 3: Structure ────────────────────────────────────────────────
        let document = self.structurer.structure(&transcript).await?;

        if self.options.strict_validation {
            schema::validate(&document).inspect_err(|e| error!("{e}"))?;
        }

        // ── Step 4: Save ─────────────────────────────────────────────────────
        let output_path = self.writer.save(&document, source_name).await?;

        info!(
            "Processed '{}' in {}ms.",
            source_name,
            start.elapsed().as_millis()
        );
        Ok(IngestionResult::success(output_path, document))
    }
}
