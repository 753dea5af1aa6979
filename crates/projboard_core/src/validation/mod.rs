//! Input validation for the project form.
//!
//! # Responsibility
//! - Evaluate declarative constraints against raw field values.
//! - Gate every `add_project` call made from user input.

pub mod project_input;
pub mod rules;
