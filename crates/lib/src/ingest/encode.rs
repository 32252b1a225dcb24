use crate::{errors::IngestError, types::EncodedDocument};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error};

/// Reads the file at `path` and base64-encodes its bytes.
///
/// A missing file is reported as [`IngestError::NotFound`]; any other read
/// failure as [`IngestError::Io`].
pub async fn encode_pdf(path: impl AsRef<Path>) -> Result<EncodedDocument, IngestError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            error!("The file {} was not found.", path.display());
            IngestError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            error!("Error encoding PDF '{}': {e}", path.display());
            IngestError::io(path, e)
        }
    })?;

    let encoded = STANDARD.encode(&bytes);
    debug!(
        "Encoded '{}': {} bytes, {} bytes as base64",
        path.display(),
        bytes.len(),
        encoded.len()
    );
    Ok(EncodedDocument::new(encoded))
}
