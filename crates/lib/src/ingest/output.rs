use crate::{errors::IngestError, types::StructuredDocument};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Suffix appended to the source file's stem to name the output file.
pub const OUTPUT_SUFFIX: &str = "_structured.json";

/// Persists structured documents as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The output path for a source file name: `<dir>/<stem>_structured.json`.
    pub fn target_path(&self, source_name: &str) -> PathBuf {
        let stem = Path::new(source_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_name.to_string());
        self.output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"))
    }

    /// Writes `document` with 2-space indentation and returns the path.
    ///
    /// An existing file with the same name is replaced. The content goes to a
    /// temporary file in the output directory first and is renamed into place,
    /// so readers never see a half-written file.
    pub async fn save(
        &self,
        document: &StructuredDocument,
        source_name: &str,
    ) -> Result<PathBuf, IngestError> {
        let path = self.target_path(source_name);
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| IngestError::io(&path, e.into()))?;

        self.write_atomically(&path, json.into_bytes())
            .await
            .inspect_err(|e| error!("Error saving output: {e}"))?;

        info!("Saved structured output to '{}'.", path.display());
        Ok(path)
    }

    async fn write_atomically(&self, path: &Path, bytes: Vec<u8>) -> Result<(), IngestError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| IngestError::io(&self.output_dir, e))?;

        let tmp = tempfile::Builder::new()
            .prefix(".structured-")
            .suffix(".tmp")
            .tempfile_in(&self.output_dir)
            .map_err(|e| IngestError::io(&self.output_dir, e))?;

        tokio::fs::write(tmp.path(), bytes)
            .await
            .map_err(|e| IngestError::io(tmp.path(), e))?;

        tmp.persist(path)
            .map_err(|e| IngestError::io(path, e.error))?;
        Ok(())
    }
}
