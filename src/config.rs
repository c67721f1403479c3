//! Inputs of a compilation run.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::base::constants::{FIELD_FILE_EXT, MODEL_FILE_EXT};
use crate::project::file_loader::collect_file_paths;

/// Master formats and definition files of one compilation run.
///
/// ```ignore
/// let config = DefinitionConfig::new()
///     .with_master_formats(["marc", "json"])
///     .discover("config/fields", "config/models")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionConfig {
    /// Formats accepted in creator lines and `@master_format(...)`
    pub master_formats: IndexSet<SmolStr>,
    pub field_files: Vec<PathBuf>,
    pub model_files: Vec<PathBuf>,
    /// Fallback directory for relative `include(...)` paths
    pub base_dir: Option<PathBuf>,
}

impl DefinitionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_master_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.master_formats.extend(formats.into_iter().map(Into::into));
        self
    }

    pub fn with_field_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.field_files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_model_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.model_files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Add every field file below `field_dir` and every model file below
    /// `model_dir`. `field_dir` also becomes the base directory unless one was
    /// set.
    pub fn discover(mut self, field_dir: impl AsRef<Path>, model_dir: impl AsRef<Path>) -> io::Result<Self> {
        let field_dir = field_dir.as_ref();
        self.field_files
            .extend(collect_file_paths(field_dir, FIELD_FILE_EXT)?);
        self.model_files
            .extend(collect_file_paths(model_dir.as_ref(), MODEL_FILE_EXT)?);
        if self.base_dir.is_none() {
            self.base_dir = Some(field_dir.to_path_buf());
        }
        Ok(self)
    }

    pub fn is_master_format(&self, name: &str) -> bool {
        self.master_formats.contains(name)
    }
}
