//! Parser error handling module
//!
//! Every grammar failure is a [`SyntaxError`] with a line and column. The
//! compilers attach the file name before returning it.
//!
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages ("in creator block")
//! - Optional hints for common mistakes

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::SyntaxError;
