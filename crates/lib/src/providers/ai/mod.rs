pub mod openai;

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a chat-completion model.
///
/// Implementations send one system turn and one user turn and return the text
/// of the first completion choice.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError>;
}

dyn_clone::clone_trait_object!(AiProvider);
