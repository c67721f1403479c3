//! # Semantic Analysis
//!
//! Turns parsed field and model files into resolved definition tables.
//!
//! - [`FieldParser`] compiles field files into a [`FieldDefinitionTable`] and
//!   [`LegacyFieldMatchings`], resolving includes, inheritance, overrides and
//!   extensions.
//! - [`ModelParser`] compiles model files into a [`ModelDefinitionTable`],
//!   validating every field against the field table.
//!
//! Both read sources through a [`SourceLoader`].

pub mod errors;
pub mod field_definition;
pub mod field_parser;
pub mod inheritance;
pub mod model_definition;
pub mod model_parser;
pub mod source;

pub use errors::{FieldParserError, ModelParserError, SourceLocation};
pub use field_definition::{
    CheckerCall, FieldDefinition, FieldDefinitionTable, FieldEntry, FieldKind, FieldRules,
    LegacyFieldMatchings, SubRule, bare_name,
};
pub use field_parser::FieldParser;
pub use inheritance::resolution_order;
pub use model_definition::{ModelCheckerCall, ModelDefinition, ModelDefinitionTable};
pub use model_parser::{ModelParser, model_name};
pub use source::{MemoryLoader, SourceLoader};
