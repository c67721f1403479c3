//! On-disk definition files for compiler tests.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use recfield::semantic::{
    FieldDefinitionTable, FieldParser, FieldParserError, LegacyFieldMatchings,
    ModelDefinitionTable, ModelParser, ModelParserError,
};
use recfield::{DefinitionConfig, FsLoader};
use smol_str::SmolStr;
use tempfile::TempDir;

/// Master formats accepted by every fixture
pub const MASTER_FORMATS: &[&str] = &["MARC", "marc", "json"];

pub fn master_formats() -> IndexSet<SmolStr> {
    MASTER_FORMATS.iter().copied().map(SmolStr::new).collect()
}

/// A temporary directory of field and model files
pub struct DefinitionDir {
    dir: TempDir,
}

impl DefinitionDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Compile field files with the fixture master formats.
    pub fn compile_fields(
        &self,
        files: &[PathBuf],
    ) -> Result<(FieldDefinitionTable, LegacyFieldMatchings), FieldParserError> {
        let formats = master_formats();
        FieldParser::new(&formats, &FsLoader)
            .with_base_dir(self.path())
            .compile(files)
    }

    pub fn compile_models(
        &self,
        files: &[PathBuf],
        fields: &FieldDefinitionTable,
    ) -> Result<ModelDefinitionTable, ModelParserError> {
        ModelParser::new(&FsLoader).compile(files, fields)
    }

    /// Config over every `.cfg` file in `fields/` and `models/`.
    pub fn config(&self) -> DefinitionConfig {
        DefinitionConfig::new()
            .with_master_formats(MASTER_FORMATS.iter().copied())
            .discover(self.path().join("fields"), self.path().join("models"))
            .expect("Failed to discover definition files")
    }
}

/// Write each `(name, source)` pair and compile them as field files, in order.
pub fn compile_field_sources(
    sources: &[(&str, &str)],
) -> Result<(FieldDefinitionTable, LegacyFieldMatchings), FieldParserError> {
    let dir = DefinitionDir::new();
    let files: Vec<PathBuf> = sources
        .iter()
        .map(|(name, source)| dir.write(name, source))
        .collect();
    dir.compile_fields(&files)
}

/// Like [`compile_field_sources`] but panics with the error message.
pub fn fields_from_sources(sources: &[(&str, &str)]) -> (FieldDefinitionTable, LegacyFieldMatchings) {
    compile_field_sources(sources).unwrap_or_else(|err| panic!("Compilation failed: {err}"))
}
