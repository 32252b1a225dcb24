pub mod mistral;

use crate::{
    errors::ProviderError,
    types::{EncodedDocument, OcrTranscript},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an OCR service.
///
/// The provider receives the whole document inline and returns its transcript.
/// Calls may block for as long as the remote OCR job runs.
#[async_trait]
pub trait OcrProvider: Send + Sync + Debug + DynClone {
    async fn run_ocr(&self, document: &EncodedDocument) -> Result<OcrTranscript, ProviderError>;
}

dyn_clone::clone_trait_object!(OcrProvider);
