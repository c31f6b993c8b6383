//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `mcqgen-server`.

pub mod general;
pub mod quiz;

pub use general::*;
pub use quiz::*;

use super::{errors::AppError, state::AppState};
