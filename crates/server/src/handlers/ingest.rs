//! # Ingestion Handler
//!
//! `POST /ingest` accepts a multipart upload with a single `file` part holding
//! a PDF, runs it through the document pipeline and answers with the
//! structured document.

use super::{AppError, AppState};
use crate::staging::StagedUpload;
use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::Multipart;
use docstruct::IngestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const SUCCESS_MESSAGE: &str = "PDF processed successfully";

/// The response body for a successful `/ingest` request.
#[derive(Serialize, Deserialize, Debug)]
pub struct IngestResponse {
    pub status: String,
    pub message: String,
    pub output_path: String,
    pub content: Value,
}

/// Whether an uploaded file name is acceptable as a PDF.
pub fn is_pdf_file_name(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".pdf")
}

/// Handler for PDF uploads.
pub async fn ingest_pdf_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                if !is_pdf_file_name(&file_name) {
                    warn!("Rejected upload '{file_name}': not a PDF.");
                    return Err(IngestError::BadRequest("File must be a PDF".to_string()).into());
                }
                let data = field.bytes().await?;
                info!("Received file: {} ({} bytes)", file_name, data.len());
                upload = Some((file_name, data));
            }
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    let (file_name, data) = upload.ok_or_else(|| {
        IngestError::BadRequest("No file uploaded. Provide a 'file' part.".to_string())
    })?;

    let staged = StagedUpload::write(&app_state.config.temp_dir, &file_name, &data).await?;
    let result = app_state
        .processor
        .process(staged.path(), &file_name)
        .await?;
    drop(staged);

    Ok(Json(IngestResponse {
        status: result.status.to_string(),
        message: SUCCESS_MESSAGE.to_string(),
        output_path: result.output_path.display().to_string(),
        content: result.content.into_value(),
    }))
}
