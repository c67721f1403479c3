//! Access to definition file contents.
//!
//! The compilers never touch the filesystem directly; they read through a
//! [`SourceLoader`]. `project::FsLoader` reads from disk, [`MemoryLoader`]
//! serves in-memory sources.

use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Reads definition files by path. Shared across parser threads.
pub trait SourceLoader: Sync {
    fn read(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;
}

/// Sources held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }

    pub fn remove(&mut self, path: &Path) -> Option<String> {
        self.files.remove(path)
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no source registered for '{}'", path.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with_file("a.cfg", "title:\n");
        assert!(loader.exists(Path::new("a.cfg")));
        assert_eq!(loader.read(Path::new("a.cfg")).unwrap(), "title:\n");
        let err = loader.read(Path::new("b.cfg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
