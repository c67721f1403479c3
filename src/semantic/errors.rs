//! Error types of the field and model compilers.

use std::fmt;
use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::Position;
use crate::parser::SyntaxError;

/// A file and a position inside it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceLocation {
    pub file: PathBuf,
    pub position: Position,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, position: Position) -> Self {
        Self {
            file: file.into(),
            position,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.position)
    }
}

/// Errors raised while compiling field definition files.
#[derive(Debug, Error)]
pub enum FieldParserError {
    /// Grammar or structural error in a field file.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A field file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `include(...)` target does not exist.
    #[error("{location}: included file '{include}' does not exist")]
    MissingInclude {
        include: String,
        location: SourceLocation,
    },

    /// A field is created twice.
    #[error("{location}: field '{json_id}' is already defined at {previous}")]
    DuplicateField {
        json_id: SmolStr,
        location: SourceLocation,
        previous: SourceLocation,
    },

    /// An override or extend rule names a field that was never created.
    #[error("{location}: cannot {action} field '{json_id}': it is not defined")]
    UndefinedTarget {
        json_id: SmolStr,
        action: &'static str,
        location: SourceLocation,
    },

    /// A rule has neither a definition section nor a parent to inherit from.
    #[error("{location}: field '{json_id}' needs a creator, derived or calculated section")]
    MissingFieldType {
        json_id: SmolStr,
        location: SourceLocation,
    },

    /// A field lists itself as a parent.
    #[error("{location}: field '{json_id}' inherits from itself")]
    SelfInheritance {
        json_id: SmolStr,
        location: SourceLocation,
    },

    /// A parent field does not exist.
    #[error("{location}: field '{json_id}' inherits from undefined field '{parent}'")]
    UnresolvedInheritance {
        json_id: SmolStr,
        parent: SmolStr,
        location: SourceLocation,
    },

    /// Fields inherit from each other in a loop.
    #[error("cyclic field inheritance: {}", join(.cycle))]
    CyclicInheritance { cycle: Vec<SmolStr> },

    /// Inheritance between fields that are not both creator fields.
    #[error(
        "{location}: field '{json_id}' ({kind}) cannot inherit from '{parent}' ({parent_kind}); only creator fields share rules"
    )]
    IncompatibleInheritance {
        json_id: SmolStr,
        kind: &'static str,
        parent: SmolStr,
        parent_kind: &'static str,
        location: SourceLocation,
    },

    /// Two fields claim the same name.
    #[error("alias '{alias}' of field '{json_id}' is already used by '{existing}'")]
    AliasConflict {
        alias: SmolStr,
        json_id: SmolStr,
        existing: SmolStr,
    },

    /// A bare name is both a field and the group of its `[0]`/`[n]` variants.
    #[error("{location}: '{json_id}' clashes with the marked variants of the same field")]
    MarkerConflict {
        json_id: SmolStr,
        location: SourceLocation,
    },
}

/// Errors raised while compiling model definition files.
#[derive(Debug, Error)]
pub enum ModelParserError {
    /// Grammar or structural error in a model file.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A model file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two files produce the same model name.
    #[error("model '{name}' in '{}' is already defined by '{}'", .file.display(), .previous.display())]
    DuplicateModel {
        name: SmolStr,
        file: PathBuf,
        previous: PathBuf,
    },

    /// A model file has no `fields:` section, or an empty one.
    #[error("model '{name}' in '{}' needs a fields section with at least one entry", .file.display())]
    MissingFields { name: SmolStr, file: PathBuf },

    /// A model lists a field that is not defined.
    #[error("{location}: model '{model}' uses undefined field '{json_id}'")]
    UnknownField {
        model: SmolStr,
        json_id: SmolStr,
        location: SourceLocation,
    },

    /// A model inherits from a model that does not exist.
    #[error("model '{model}' inherits from undefined model '{parent}'")]
    UnknownModel { model: SmolStr, parent: SmolStr },

    /// Models inherit from each other in a loop.
    #[error("cyclic model inheritance: {}", join(.cycle))]
    CyclicInheritance { cycle: Vec<SmolStr> },
}

fn join(names: &[SmolStr]) -> String {
    names
        .iter()
        .map(SmolStr::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
