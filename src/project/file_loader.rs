//! Reading definition files from disk and discovering them below a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use crate::semantic::SourceLoader;

/// Reads definition files from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        trace!(path = %path.display(), "reading definition file");
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Extension of a path, without the dot
pub fn get_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Every file below `dir` with the given extension, sorted by path.
pub fn collect_file_paths(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && get_extension(entry.path()) == Some(extension) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests;
