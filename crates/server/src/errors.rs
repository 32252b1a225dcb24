use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use docstruct::IngestError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Every variant becomes a JSON body of the form
/// `{"detail": <message>, "code": <stable code>}`.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the ingestion pipeline.
    Ingest(IngestError),
    /// The multipart request body could not be read.
    Multipart(MultipartError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, code, detail) = match self {
            AppError::Ingest(err) => {
                error!(code = err.code(), "Error processing PDF: {err}");
                let status = match err {
                    IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code(), err.to_string())
            }
            AppError::Multipart(err) => {
                error!("Invalid multipart body: {err}");
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "payload_too_large"
                } else {
                    "bad_request"
                };
                (status, code, err.body_text())
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "detail": detail,
            "code": code,
        }));

        (status_code, body).into_response()
    }
}
