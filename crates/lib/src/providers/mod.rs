//! # Upstream Providers
//!
//! Adapters for the two external services the pipeline depends on: the OCR
//! service that transcribes a PDF and the chat-completion model that turns the
//! transcript into structured JSON. Both sit behind traits so the pipeline can
//! be driven by mocks in tests.

pub mod ai;
pub mod ocr;
pub mod retry;

use crate::errors::ProviderError;
use reqwest::Client as ReqwestClient;
use std::time::Duration;

/// Builds the HTTP client shared by a provider for its whole lifetime.
///
/// Without a timeout the client waits as long as the remote service takes.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<ReqwestClient, ProviderError> {
    let mut builder = ReqwestClient::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ProviderError::ReqwestClientBuild)
}

/// Stand-in for an API key in `Debug` output.
pub(crate) fn redact_key(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
