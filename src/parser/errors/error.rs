//! Syntax error type
//!
//! Provides:
//! - Error codes for categorization
//! - Byte range plus 1-based line/column
//! - The file the error was found in, once the driver knows it
//! - Hints/suggestions for fixes

use std::fmt;
use std::path::{Path, PathBuf};

use text_size::TextRange;

use super::codes::ErrorCode;
use crate::base::Position;

/// A grammar or structural error in a definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Categorized error code
    pub code: ErrorCode,
    /// Source byte range
    pub range: TextRange,
    /// 1-based line/column of the start of `range`
    pub position: Position,
    /// File being parsed, filled in by the file-level driver
    pub file: Option<PathBuf>,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
}

impl SyntaxError {
    pub fn new(
        message: impl Into<String>,
        code: ErrorCode,
        range: TextRange,
        position: Position,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            range,
            position,
            file: None,
            hint: None,
        }
    }

    /// Add a hint to this error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach the file this error belongs to
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// 1-based line of the error
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 1-based column of the error
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Check if this error has a hint
    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "{}: {}: {}", self.position, self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
