//! # Prompt Templates
//!
//! Prompt text sent to the structuring model. The wording is part of the
//! service's observable contract: callers rely on the output shape it asks
//! for, so edits here change behavior.

pub mod structuring;

pub use structuring::{structuring_user_prompt, STRUCTURING_SYSTEM_PROMPT, STRUCTURING_USER_PREFIX};
