use crate::{
    errors::ProviderError,
    providers::{build_http_client, ocr::OcrProvider, redact_key},
    types::{EncodedDocument, OcrTranscript},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

const PROVIDER: &str = "Mistral OCR";

pub const DEFAULT_MISTRAL_OCR_API_URL: &str = "https://api.mistral.ai/v1/ocr";
pub const DEFAULT_MISTRAL_OCR_MODEL: &str = "mistral-ocr-latest";

// --- Mistral OCR request and response structures ---

#[derive(Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: DocumentSource,
}

#[derive(Serialize)]
struct DocumentSource {
    #[serde(rename = "type")]
    kind: &'static str,
    document_url: String,
}

#[derive(Deserialize, Debug)]
struct OcrResponse {
    #[serde(default)]
    pages: Option<Vec<OcrPage>>,
}

#[derive(Deserialize, Debug)]
struct OcrPage {
    #[serde(default)]
    index: usize,
    #[serde(default)]
    markdown: String,
}

// --- Mistral OCR Provider implementation ---

/// A provider for the Mistral OCR API.
#[derive(Clone)]
pub struct MistralOcrProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl MistralOcrProvider {
    /// Creates a new `MistralOcrProvider`.
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_url,
            api_key,
            model,
        })
    }
}

impl fmt::Debug for MistralOcrProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MistralOcrProvider")
            .field("api_url", &self.api_url)
            .field("api_key", &redact_key(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl OcrProvider for MistralOcrProvider {
    async fn run_ocr(&self, document: &EncodedDocument) -> Result<OcrTranscript, ProviderError> {
        let request_body = OcrRequest {
            model: &self.model,
            document: DocumentSource {
                kind: "document_url",
                document_url: document.data_uri(),
            },
        };

        debug!(model = %self.model, size = document.as_base64().len(), "--> Submitting document for OCR");
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                status,
                message: error_text,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|source| ProviderError::Deserialization {
                provider: PROVIDER,
                source,
            })?;

        Ok(OcrTranscript {
            text: transcript_text(&raw),
            raw,
        })
    }
}

/// Flattens an OCR response into plain text.
///
/// Page markdown is joined in page order. A response without a `pages` array
/// is passed on verbatim as its JSON text.
fn transcript_text(raw: &Value) -> String {
    match serde_json::from_value::<OcrResponse>(raw.clone()) {
        Ok(OcrResponse { pages: Some(mut pages) }) => {
            pages.sort_by_key(|p| p.index);
            pages
                .into_iter()
                .map(|p| p.markdown)
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        _ => raw.to_string(),
    }
}
