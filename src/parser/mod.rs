//! Parser for field and model definition files
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser state (tokens + IndentStack) → grammar::{field, model}
//!     ↓
//! AST (FieldFile / ModelFile) → semantic compilers
//! ```
//!
//! Embedded host-language expressions are never interpreted: they are kept
//! as raw source text. Decorator payloads that must be understood are read
//! by the literal evaluator in [`literal`].

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod errors;
pub mod grammar;
mod indent;
mod lexer;
pub mod literal;
mod syntax_kind;

pub use ast::*;
pub use errors::{ErrorCode, ParseContext, SyntaxError};
pub use grammar::{parse_field_file, parse_model_file};
pub use indent::{IndentError, IndentStack};
pub use lexer::{Lexer, Token, tokenize};
pub use literal::{Literal, LiteralError, parse_literal};
pub use syntax_kind::SyntaxKind;

/// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
