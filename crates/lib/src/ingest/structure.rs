use crate::{
    errors::IngestError,
    prompts::{structuring_user_prompt, STRUCTURING_SYSTEM_PROMPT},
    providers::{ai::AiProvider, retry::RetryPolicy},
    types::{OcrTranscript, StructuredDocument},
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Turns OCR transcripts into structured documents with a chat-completion model.
///
/// The model's answer only has to parse as JSON; its shape is not checked here.
#[derive(Clone, Debug)]
pub struct Structurer {
    ai_provider: Box<dyn AiProvider>,
    retry: RetryPolicy,
}

impl Structurer {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self {
            ai_provider,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends the transcript to the model and parses its answer.
    ///
    /// An empty transcript fails without contacting the model.
    #[instrument(skip_all, fields(transcript_len = transcript.text.len()))]
    pub async fn structure(
        &self,
        transcript: &OcrTranscript,
    ) -> Result<StructuredDocument, IngestError> {
        if transcript.is_empty() {
            warn!("OCR transcript is empty. Skipping structuring.");
            return Err(IngestError::Structuring(
                "OCR transcript is empty; nothing to structure".to_string(),
            ));
        }

        let user_prompt = structuring_user_prompt(&transcript.text);
        let completion = self
            .retry
            .run("structuring", || {
                self.ai_provider
                    .generate(STRUCTURING_SYSTEM_PROMPT, &user_prompt)
            })
            .await
            .map_err(|e| {
                error!("Error processing content with the structuring model: {e}");
                IngestError::Structuring(e.to_string())
            })?;

        info!("Structuring model answered with {} chars.", completion.len());
        debug!("Structuring model response content: {completion}");

        let value: Value = serde_json::from_str(&completion).map_err(|e| {
            error!("JSON decode error: {e}");
            error!("Failed content: {completion}");
            IngestError::Structuring(format!("model response is not valid JSON: {e}"))
        })?;

        Ok(StructuredDocument(value))
    }
}
