//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (indentation, delimiters)
//! - E03xx: Declaration errors (rule headers, sections)
//! - E04xx: Expression and literal errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Invalid numeric literal
    E0103,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Expected an indented block ("not a subentry")
    E0201,
    /// Dedent to a column that is not an enclosing level ("not an unindent")
    E0202,
    /// Unexpected indentation inside a block
    E0203,
    /// Unclosed delimiter
    E0204,
    /// Unexpected closing delimiter
    E0205,
    /// Trailing content at end of line
    E0206,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Missing field identifier
    E0301,
    /// Unknown section keyword in a rule or model body
    E0302,
    /// Section repeated in the same body
    E0303,
    /// Unknown decorator
    E0304,
    /// Unrecognized master format
    E0305,
    /// Conflicting rule decorators
    E0306,
    /// Missing `:` after a header
    E0307,

    // =========================================================================
    // E04xx: Expression and literal errors
    // =========================================================================
    /// Expected an expression
    E0401,
    /// Malformed literal payload
    E0402,
    /// Literal has the wrong shape for its decorator
    E0403,

    // =========================================================================
    // E09xx: Generic errors
    // =========================================================================
    /// Unexpected token
    E0901,
    /// Expected token
    E0902,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0206 => "E0206",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0305 => "E0305",
            Self::E0306 => "E0306",
            Self::E0307 => "E0307",
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0403 => "E0403",
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 | Self::E0206 => {
                "structural error"
            }
            Self::E0301
            | Self::E0302
            | Self::E0303
            | Self::E0304
            | Self::E0305
            | Self::E0306
            | Self::E0307 => "declaration error",
            Self::E0401 | Self::E0402 | Self::E0403 => "expression error",
            Self::E0901 | Self::E0902 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "invalid numeric literal",
            Self::E0201 => "not a subentry",
            Self::E0202 => "not an unindent",
            Self::E0203 => "unexpected indentation",
            Self::E0204 => "unclosed delimiter",
            Self::E0205 => "unexpected closing delimiter",
            Self::E0206 => "unexpected content at end of line",
            Self::E0301 => "missing field identifier",
            Self::E0302 => "unknown section",
            Self::E0303 => "duplicate section",
            Self::E0304 => "unknown decorator",
            Self::E0305 => "unrecognized master format",
            Self::E0306 => "conflicting decorators",
            Self::E0307 => "missing ':'",
            Self::E0401 => "expected expression",
            Self::E0402 => "malformed literal",
            Self::E0403 => "unexpected literal shape",
            Self::E0901 => "unexpected token",
            Self::E0902 => "expected token",
        }
    }

    /// Check if this is a structural error (indentation or delimiter related)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 | Self::E0206
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
