use async_trait::async_trait;
use docstruct::errors::ProviderError;
use docstruct::providers::{ai::AiProvider, ocr::OcrProvider};
use docstruct::types::{EncodedDocument, OcrTranscript};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

fn mock_error(status: StatusCode, message: &str) -> ProviderError {
    ProviderError::Api {
        provider: "mock",
        status,
        message: message.to_string(),
    }
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the user prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Makes every call fail with an API error of the given status.
    pub fn fail_with(&self, status: StatusCode, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some((status, message)) = self.failure.lock().unwrap().clone() {
            return Err(mock_error(status, &message));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(mock_error(
            StatusCode::NOT_FOUND,
            &format!("MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"),
        ))
    }
}

// --- Mock OCR Provider ---

#[derive(Clone, Debug, Default)]
pub struct MockOcrProvider {
    transcript: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    documents: Arc<Mutex<Vec<String>>>,
}

impl MockOcrProvider {
    /// A provider that answers every document with `transcript`.
    pub fn returning(transcript: &str) -> Self {
        let mock = Self::default();
        *mock.transcript.lock().unwrap() = Some(transcript.to_string());
        mock
    }

    /// A provider that fails every call with an API error of the given status.
    pub fn failing(status: StatusCode, message: &str) -> Self {
        let mock = Self::default();
        *mock.failure.lock().unwrap() = Some((status, message.to_string()));
        mock
    }

    /// The data URIs of every document submitted so far.
    pub fn submitted_documents(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl OcrProvider for MockOcrProvider {
    async fn run_ocr(&self, document: &EncodedDocument) -> Result<OcrTranscript, ProviderError> {
        self.documents.lock().unwrap().push(document.data_uri());

        if let Some((status, message)) = self.failure.lock().unwrap().clone() {
            return Err(mock_error(status, &message));
        }

        let text = self.transcript.lock().unwrap().clone().unwrap_or_default();
        Ok(OcrTranscript::from_text(text))
    }
}

// --- Test-Specific Helpers ---

pub mod helpers {
    use serde_json::{json, Value};

    /// Bytes of a minimal one-page PDF. The mocks never parse it, but it keeps
    /// uploads realistic.
    pub fn sample_pdf_bytes() -> Vec<u8> {
        b"%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n\
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] >> endobj\n\
trailer << /Root 1 0 R >>\n%%EOF\n"
            .to_vec()
    }

    /// A structured document that satisfies the strict schema.
    pub fn sample_structured_document() -> Value {
        json!({
            "metadata": {
                "document_date": "2024-01-01",
                "other_dates": [],
                "references": {
                    "letters": [],
                    "clauses_articles_acts": [],
                    "persons": []
                }
            },
            "content": [
                {"type": "title", "text": "Section 1: Intro", "page_number": 1, "metadata": {}}
            ]
        })
    }
}
