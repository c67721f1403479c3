//! # recfield-base
//!
//! Compiler for record field and model definition files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → File loading, full compilation runs, DefinitionCache
//!   ↓
//! semantic  → FieldParser / ModelParser, definition tables, inheritance
//!   ↓
//! parser    → Logos lexer, indentation-aware recursive-descent grammars
//!   ↓
//! base      → Primitives (Position, LineIndex, TextRange, constants)
//! ```
//!
//! `config` holds the inputs of a run: master formats and file sets.

// ============================================================================
// MODULES (dependency order: base → parser → semantic → project)
// ============================================================================

/// Foundation types: Position, LineIndex, TextRange, constants
pub mod base;

/// Parser: Logos lexer, field and model grammars, syntax errors
pub mod parser;

/// Semantic: definition tables and the field/model compilers
pub mod semantic;

/// Project management: file loading, compilation, caching
pub mod project;

/// Compilation inputs
pub mod config;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, TextRange, TextSize};

pub use config::DefinitionConfig;
pub use parser::{SyntaxError, parse_field_file, parse_model_file};
pub use project::{DefinitionCache, DefinitionError, Definitions, FsLoader};
pub use semantic::{
    FieldDefinition, FieldDefinitionTable, FieldKind, FieldParser, FieldParserError,
    LegacyFieldMatchings, ModelDefinition, ModelDefinitionTable, ModelParser, ModelParserError,
};
