//! Utility functions.
//!
//! - [`token_generator`] - Short token generation

pub mod token_generator;
