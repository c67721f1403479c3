//! Project layer: loading definition files from disk, compiling a full run
//! and caching the result.

mod cache;
mod definitions;
pub mod file_loader;

pub use cache::DefinitionCache;
pub use definitions::{DefinitionError, Definitions, ResolvedModel};
pub use file_loader::{FsLoader, collect_file_paths};
