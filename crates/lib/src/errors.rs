use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to an upstream provider (OCR or LLM).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to {provider}: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to deserialize {provider} response: {source}")]
    Deserialization {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned an error (HTTP {status}): {message}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),
}

impl ProviderError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Transport failures (including timeouts), rate limiting and server-side
    /// errors qualify. Authentication and validation errors do not.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Request { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            ProviderError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/// Errors produced by the ingestion pipeline.
///
/// Each variant corresponds to one failure kind of the upload, OCR,
/// structuring and persistence chain. [`IngestError::code`] gives the stable
/// machine-readable code exposed to HTTP callers.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The request itself is unacceptable (e.g. not a PDF).
    #[error("{0}")]
    BadRequest(String),
    #[error("The file {} was not found.", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The OCR provider failed.
    #[error("OCR request failed: {0}")]
    Upstream(#[source] ProviderError),
    /// The structuring model failed or answered with something that is not JSON.
    #[error("Structuring failed: {0}")]
    Structuring(String),
    /// Strict validation rejected the structured output.
    #[error("Structured output violates the document schema: {}", violations.join("; "))]
    Schema { violations: Vec<String> },
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::BadRequest(_) => "bad_request",
            IngestError::NotFound { .. } => "not_found",
            IngestError::Io { .. } => "io_error",
            IngestError::Upstream(_) => "upstream_error",
            IngestError::Structuring(_) => "structuring_error",
            IngestError::Schema { .. } => "schema_violation",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}
