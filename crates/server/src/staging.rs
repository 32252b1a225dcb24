//! Staging of uploaded PDFs on disk for the duration of one request.

use docstruct::IngestError;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

/// An uploaded document written to the staging directory.
///
/// Each upload gets its own randomly named file, so concurrent uploads with the
/// same name never touch each other. The file is deleted when the guard drops,
/// whichever way the request ends.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Writes `data` to a fresh file in `staging_dir`.
    ///
    /// The uploaded `file_name` only contributes a sanitized suffix to the
    /// staged name; it is never used as a path.
    pub async fn write(
        staging_dir: &Path,
        file_name: &str,
        data: &[u8],
    ) -> Result<Self, IngestError> {
        let io_err = |source| IngestError::Io {
            path: staging_dir.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(staging_dir)
            .await
            .map_err(io_err)?;

        let file = tempfile::Builder::new()
            .prefix(&format!("{}-", Uuid::new_v4()))
            .suffix(&format!("-{}", suffix_hint(file_name)))
            .rand_bytes(0)
            .tempfile_in(staging_dir)
            .map_err(io_err)?;

        tokio::fs::write(file.path(), data)
            .await
            .map_err(|source| IngestError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;

        debug!(path = %file.path().display(), bytes = data.len(), "Staged upload.");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

/// Keeps the last path component of `file_name`, restricted to a safe charset.
fn suffix_hint(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let hint: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if hint.trim_matches('.').is_empty() {
        "upload.pdf".to_string()
    } else {
        hint
    }
}
