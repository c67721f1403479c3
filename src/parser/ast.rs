//! Syntax trees of field and model definition files
//!
//! These are the raw, per-file parse results. They keep decorator payloads
//! as raw text or evaluated literals and carry the position of every rule so
//! that the compilers can report semantic errors against the source.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Position;

// =============================================================================
// Field files
// =============================================================================

/// One parsed field definition file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldFile {
    pub includes: Vec<Include>,
    pub rules: Vec<FieldRule>,
}

/// `include("path")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub path: String,
    pub position: Position,
}

/// How a rule relates to an existing field with the same identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleMode {
    /// Defines a new field
    #[default]
    Create,
    /// Replaces parts of an existing field
    Override,
    /// Attaches checkers, producers and documentation to an existing field
    Extend,
}

/// One rule block of a field file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRule {
    pub json_id: SmolStr,
    pub aliases: Vec<SmolStr>,
    pub persistent_identifier: Option<i64>,
    pub inherit_from: Option<Vec<SmolStr>>,
    pub mode: RuleMode,
    pub hidden: bool,
    pub body: Option<RuleBody>,
    pub checkers: Vec<Checker>,
    /// `(producer code, raw expression)` in file order
    pub producers: Vec<(SmolStr, String)>,
    pub documentation: Option<Documentation>,
    pub position: Position,
}

/// The `creator`, `derived` or `calculated` section of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleBody {
    Creator(Vec<CreatorLine>),
    Derived(ExprBody),
    Calculated(ExprBody),
}

impl RuleBody {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Creator(_) => "creator",
            Self::Derived(_) => "derived",
            Self::Calculated(_) => "calculated",
        }
    }
}

/// `MASTER_FORMAT, "tags", expr` with its decorators
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorLine {
    pub master_format: SmolStr,
    /// The quoted source tag text, whitespace separated tags
    pub source_tags: String,
    pub value: String,
    pub decorators: RuleDecorators,
    pub legacy: Vec<LegacyPayload>,
    pub position: Position,
}

/// Body of a `derived:` or `calculated:` section
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBody {
    pub value: String,
    pub decorators: RuleDecorators,
    pub legacy: Vec<LegacyPayload>,
    pub position: Position,
}

/// Decorators of one creator line or derived/calculated body.
///
/// Payloads are the text inside the parentheses. A repeated decorator keeps
/// its last payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RuleDecorators {
    pub depends_on: Option<String>,
    pub only_if: Option<String>,
    pub only_if_master_value: Option<String>,
    pub parse_first: Option<String>,
    pub do_not_cache: bool,
}

/// Evaluated `@legacy(...)` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPayload {
    /// Set by the `(format, entries)` form used on derived/calculated bodies
    pub master_format: Option<SmolStr>,
    pub entries: Vec<LegacyEntry>,
}

/// One `(tags, subfield)` pair of a legacy payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEntry {
    pub tags: LegacyTags,
    pub subfield: Option<String>,
}

/// The tag position of a legacy entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyTags {
    One(String),
    Many(Vec<String>),
}

impl LegacyTags {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let tags: &[String] = match self {
            Self::One(tag) => std::slice::from_ref(tag),
            Self::Many(tags) => tags,
        };
        tags.iter().map(String::as_str)
    }
}

/// A field checker: `[@master_format(...)] module.function(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checker {
    pub master_formats: Vec<SmolStr>,
    /// Last segment of the dotted function name
    pub function: SmolStr,
    pub arguments: String,
}

/// `documentation:` section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documentation {
    pub text: String,
    /// `@subfield path: "doc"` entries
    pub subfields: IndexMap<SmolStr, String>,
}

// =============================================================================
// Model files
// =============================================================================

/// One parsed model definition file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelFile {
    /// `None` when the file has no `fields:` section, empty when the section
    /// has no items
    pub fields: Option<Vec<ModelFieldItem>>,
    pub documentation: Option<String>,
    pub checkers: Vec<ModelChecker>,
}

/// An entry of a model `fields:` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFieldItem {
    /// `@inherit_from(...)`
    InheritFrom(Vec<SmolStr>),
    /// `json_id` or `json_id = alias`
    Field {
        json_id: SmolStr,
        alias: Option<SmolStr>,
        position: Position,
    },
}

/// A model checker: `module.function(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChecker {
    pub function: SmolStr,
    pub arguments: String,
}
