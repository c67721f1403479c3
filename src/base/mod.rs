//! Foundation types for the recfield compiler.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`] - Line/column positions for parsed items
//! - Domain constants (file extensions, reserved names, indentation)
//!
//! This module has NO dependencies on other recfield modules.

pub mod constants;
mod position;
mod span;

pub use position::Position;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
