//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The upstream clients are created once here and
//! shared by every request.

use crate::config::AppConfig;
use docstruct::{
    providers::{ai::openai::OpenAiProvider, ocr::mistral::MistralOcrProvider},
    DocumentProcessor, OutputWriter, ProcessorOptions, RetryPolicy,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The ingestion pipeline with its OCR and structuring clients.
    pub processor: Arc<DocumentProcessor>,
}

impl AppState {
    pub fn new(config: AppConfig, processor: DocumentProcessor) -> Self {
        Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// Creates the staging and output directories, then instantiates the Mistral
/// OCR client and the OpenAI chat client and wires them into a
/// [`DocumentProcessor`].
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    tokio::fs::create_dir_all(&config.temp_dir).await?;
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let timeout = config.request_timeout();

    let ocr_provider = MistralOcrProvider::new(
        config.ocr.api_url.clone(),
        config.mistral_api_key.clone(),
        config.ocr.model.clone(),
        timeout,
    )?;

    let ai_provider = OpenAiProvider::new(
        config.llm.api_url.clone(),
        Some(config.openai_api_key.clone()),
        config.llm.model.clone(),
        timeout,
    )?
    .with_json_mode(config.llm.json_mode);

    let options = ProcessorOptions {
        strict_validation: config.strict_validation,
        retry: RetryPolicy::new(config.retry.max_attempts, config.initial_backoff()),
    };

    info!(
        ocr_model = %config.ocr.model,
        llm_model = %ai_provider.model(),
        strict = options.strict_validation,
        "Document processor ready."
    );

    let processor = DocumentProcessor::new(
        Box::new(ocr_provider),
        Box::new(ai_provider),
        OutputWriter::new(&config.output_dir),
        options,
    );

    Ok(AppState::new(config, processor))
}
