//! Utility functions for alias generation and URL processing.
//!
//! - [`code_generator`] - Random short alias generation
//! - [`url_normalizer`] - URL validation, scheme enforcement and self-domain detection

pub mod code_generator;
pub mod url_normalizer;
