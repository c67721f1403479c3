//! Grammars of the definition languages
//!
//! - `field` - field definition files (rules, includes, sections)
//! - `model` - model definition files (fields, documentation, checkers)
//! - `decorators` - `@name(...)` decorators shared by both
//!
//! Both grammars are written as functions over the shared
//! [`Parser`](super::parser::Parser) state.

pub mod decorators;
pub mod field;
pub mod model;

pub use decorators::{RULE_DECORATORS, SUB_RULE_DECORATORS};
pub use field::{RULE_SECTIONS, parse_field_file};
pub use model::{MODEL_SECTIONS, parse_model_file};
