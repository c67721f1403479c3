//! Domain constants shared by the grammars, compilers and file loading.

/// Extension of field definition files.
pub const FIELD_FILE_EXT: &str = "cfg";

/// Extension of model definition files.
pub const MODEL_FILE_EXT: &str = "cfg";

/// Checker scope used when a checker carries no `@master_format(...)`.
pub const ALL_MASTER_FORMATS: &str = "all";

/// Pseudo model that contains every known field mapped to itself.
pub const DEFAULT_MODEL: &str = "__default__";

/// Column of top-level items. Columns are 1-based.
pub const ROOT_COLUMN: usize = 1;

/// Tab stops used when measuring indentation.
pub const TAB_WIDTH: usize = 8;

/// Repeatable-field markers: first occurrence and all occurrences.
pub const FIRST_MARKER: &str = "[0]";
pub const ALL_MARKER: &str = "[n]";
