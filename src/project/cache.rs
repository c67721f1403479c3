//! Lazily compiled, shared definition tables.
//!
//! The first [`DefinitionCache::get`] compiles the configured files and keeps
//! the result; later calls return the same [`Arc`] until
//! [`DefinitionCache::invalidate`] drops it. At most one compilation runs at
//! a time, and readers never observe a half-built table.
//!
//! ```ignore
//! let cache = DefinitionCache::new(config);
//! let defs = cache.get()?;
//! let title = defs.fields.definition("title");
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use super::definitions::{DefinitionError, Definitions};
use super::file_loader::FsLoader;
use crate::config::DefinitionConfig;
use crate::semantic::SourceLoader;

pub struct DefinitionCache<L: SourceLoader = FsLoader> {
    config: DefinitionConfig,
    loader: L,
    current: RwLock<Option<Arc<Definitions>>>,
    /// Serializes compilations
    compiling: Mutex<()>,
}

impl DefinitionCache<FsLoader> {
    pub fn new(config: DefinitionConfig) -> Self {
        Self::with_loader(config, FsLoader)
    }
}

impl<L: SourceLoader> DefinitionCache<L> {
    pub fn with_loader(config: DefinitionConfig, loader: L) -> Self {
        Self {
            config,
            loader,
            current: RwLock::new(None),
            compiling: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &DefinitionConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Current tables, compiling them first if needed.
    ///
    /// A failed compilation is returned and nothing is cached, so the next
    /// call tries again.
    pub fn get(&self) -> Result<Arc<Definitions>, DefinitionError> {
        // Fast path: already compiled (read lock)
        if let Some(defs) = self.current.read().as_ref() {
            return Ok(Arc::clone(defs));
        }

        // Slow path: compile once (compile lock)
        let _guard = self.compiling.lock();

        // Double-check after acquiring the compile lock
        if let Some(defs) = self.current.read().as_ref() {
            return Ok(Arc::clone(defs));
        }

        let defs = Arc::new(Definitions::compile(&self.config, &self.loader)?);
        *self.current.write() = Some(Arc::clone(&defs));
        info!(
            fields = defs.fields.len(),
            models = defs.models.len(),
            "definition cache compiled"
        );
        Ok(defs)
    }

    /// Cached tables without compiling
    pub fn peek(&self) -> Option<Arc<Definitions>> {
        self.current.read().clone()
    }

    pub fn is_compiled(&self) -> bool {
        self.current.read().is_some()
    }

    /// Drop the cached tables; the next [`get`](Self::get) recompiles.
    ///
    /// Holders of a previous [`Arc`] keep their copy.
    pub fn invalidate(&self) {
        let _guard = self.compiling.lock();
        if self.current.write().take().is_some() {
            info!("definition cache invalidated");
        }
    }

    /// Compile now and replace the cached tables on success. On failure the
    /// previous tables stay in place.
    pub fn recompile(&self) -> Result<Arc<Definitions>, DefinitionError> {
        let _guard = self.compiling.lock();
        let defs = Arc::new(Definitions::compile(&self.config, &self.loader)?);
        *self.current.write() = Some(Arc::clone(&defs));
        info!(fields = defs.fields.len(), models = defs.models.len(), "definition cache recompiled");
        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::MemoryLoader;

    fn cache(fields: &str) -> DefinitionCache<MemoryLoader> {
        let loader = MemoryLoader::new()
            .with_file("fields.cfg", fields)
            .with_file("article.cfg", "fields:\n    title\n");
        let config = DefinitionConfig::new()
            .with_master_formats(["marc"])
            .with_field_files(["fields.cfg"])
            .with_model_files(["article.cfg"]);
        DefinitionCache::with_loader(config, loader)
    }

    const TITLE: &str = "title:\n    creator:\n        marc, \"245__a\", value\n";

    #[test]
    fn test_get_compiles_once() {
        let cache = cache(TITLE);
        assert!(!cache.is_compiled());
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.peek().is_some());
    }

    #[test]
    fn test_invalidate_forces_recompile() {
        let cache = cache(TITLE);
        let first = cache.get().unwrap();
        cache.invalidate();
        assert!(!cache.is_compiled());
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_compile_is_not_cached() {
        let cache = cache("title:\n");
        assert!(cache.get().is_err());
        assert!(!cache.is_compiled());
        assert!(cache.recompile().is_err());
    }

    #[test]
    fn test_concurrent_get_shares_one_result() {
        let cache = cache(TITLE);
        let results: Vec<Arc<Definitions>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| cache.get().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
