//! # API Route Handlers
//!
//! This module organizes the Axum route handlers for `docstruct-server`.

pub mod general;
pub mod ingest;

pub use general::*;
pub use ingest::*;

// Shared items used by the handler modules.
use super::{errors::AppError, state::AppState};
