//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the `mcqgen` library and
//! the helpers that render them.

pub mod core;
pub mod tasks;
