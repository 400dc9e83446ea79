use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use ctx_codec::codec_for;
use ctx_types::{Format, IntoFormat, Value};
use tracing::debug;

use crate::config::StoreConfig;
use crate::disk;
use crate::error::{StoreError, StoreResult};
use crate::registry::Registry;

/// Named-object store with an in-memory registry mirrored to disk.
///
/// Memory is authoritative: `load` consults disk only when the name is
/// absent from memory, and a disk hit does not repopulate memory. The two
/// tiers are never reconciled, so saving one name in both formats leaves two
/// files that may disagree with each other and with memory.
///
/// Registry access is guarded by a single `RwLock`. File I/O happens outside
/// the lock, so concurrent `save`/`delete`/`clear` calls on the same name can
/// interleave their disk effects. Callers that need a consistent memory+disk
/// view must serialize access themselves.
pub struct ContextStore {
    config: StoreConfig,
    registry: RwLock<Registry>,
}

impl ContextStore {
    /// Open a store over `config.base_dir`, starting with an empty registry.
    ///
    /// The directory is created only when `config.create_dir` is set.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if config.create_dir {
            fs::create_dir_all(&config.base_dir)?;
        }
        debug!(base_dir = %config.base_dir.display(), "opened context store");
        Ok(Self {
            config,
            registry: RwLock::new(Registry::new()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    /// Path of the file that mirrors `name` in `format`.
    pub fn file_path(&self, name: &str, format: Format) -> PathBuf {
        disk::file_path(&self.config.base_dir, name, format)
    }

    // -----------------------------------------------------------------------
    // Save / load
    // -----------------------------------------------------------------------

    /// Store `value` under `name` in memory and write it to `<name>.<ext>`.
    ///
    /// Steps run in this order:
    /// 1. Resolve `format`. An unknown name fails with `UnsupportedFormat`.
    /// 2. Encode the value. A value the format cannot represent fails with
    ///    `Serialization`.
    /// 3. Overwrite the memory entry.
    /// 4. Overwrite the file.
    ///
    /// Failures in steps 1-2 leave memory and disk untouched. A failure in
    /// step 4 leaves memory updated and the file stale (or truncated).
    pub fn save(
        &self,
        value: impl Into<Value>,
        name: &str,
        format: impl IntoFormat,
    ) -> StoreResult<()> {
        let format = format.into_format()?;
        let value = Arc::new(value.into());
        let bytes = codec_for(format)
            .encode(&value)
            .map_err(StoreError::from_encode)?;

        self.registry
            .write()
            .expect("lock poisoned")
            .insert(name, value);

        let path = self.file_path(name, format);
        fs::write(&path, &bytes)?;
        debug!(name, %format, bytes = bytes.len(), "saved context");
        Ok(())
    }

    /// Save using the configured default format.
    pub fn save_default(&self, value: impl Into<Value>, name: &str) -> StoreResult<()> {
        self.save(value, name, self.config.default_format)
    }

    /// Return the value stored under `name`.
    ///
    /// A memory hit is returned as-is and `format` is not even resolved, so
    /// the result is whatever was last saved under `name` in any format. On a
    /// memory miss the file for `format` is read and decoded; the result is
    /// not cached. Fails with `NotFound` when the file does not exist.
    pub fn load(&self, name: &str, format: impl IntoFormat) -> StoreResult<Arc<Value>> {
        let hit = self.registry.read().expect("lock poisoned").get(name);
        if let Some(value) = hit {
            debug!(name, "loaded context from memory");
            return Ok(value);
        }

        let format = format.into_format()?;
        let path = self.file_path(name, format);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                    format,
                })
            }
            Err(e) => return Err(e.into()),
        };
        let value = codec_for(format)
            .decode(&bytes)
            .map_err(|e| StoreError::from_decode(path, e))?;
        debug!(name, %format, bytes = bytes.len(), "loaded context from disk");
        Ok(Arc::new(value))
    }

    /// Load using the configured default format.
    pub fn load_default(&self, name: &str) -> StoreResult<Arc<Value>> {
        self.load(name, self.config.default_format)
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove `name` from memory and delete its files in every format.
    ///
    /// Missing entries and missing files are not errors. Returns `true` if
    /// anything was removed.
    pub fn delete(&self, name: &str) -> StoreResult<bool> {
        let in_memory = self
            .registry
            .write()
            .expect("lock poisoned")
            .remove(name)
            .is_some();

        let mut files_removed = 0;
        for format in Format::ALL {
            if disk::remove_if_exists(&self.file_path(name, format))? {
                files_removed += 1;
            }
        }
        debug!(name, in_memory, files_removed, "deleted context");
        Ok(in_memory || files_removed > 0)
    }

    /// Drop `name` from memory only, leaving its files in place.
    ///
    /// Subsequent loads fall through to disk, as they would after a restart.
    pub fn forget(&self, name: &str) -> bool {
        self.registry
            .write()
            .expect("lock poisoned")
            .remove(name)
            .is_some()
    }

    /// Empty the registry, then delete every file in the base directory,
    /// whether or not it belongs to a known context.
    ///
    /// Memory is cleared even if the directory cannot be read. Returns the
    /// number of files removed.
    pub fn clear(&self) -> StoreResult<usize> {
        self.registry.write().expect("lock poisoned").clear();
        let removed = disk::remove_all_files(&self.config.base_dir)?;
        debug!(removed, "cleared context store");
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    /// Names currently held in memory, in insertion order.
    ///
    /// Contexts that exist only on disk are not listed; see
    /// [`persisted_contexts`](Self::persisted_contexts).
    pub fn list_contexts(&self) -> Vec<String> {
        self.registry.read().expect("lock poisoned").names()
    }

    /// `(name, format)` for every file in the base directory with a known
    /// extension, sorted by name then format.
    pub fn persisted_contexts(&self) -> StoreResult<Vec<(String, Format)>> {
        Ok(disk::scan(&self.config.base_dir)?)
    }

    /// Returns `true` if `name` is held in memory.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.read().expect("lock poisoned").contains(name)
    }

    /// Number of contexts held in memory.
    pub fn len(&self) -> usize {
        self.registry.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().expect("lock poisoned").is_empty()
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStore")
            .field("base_dir", &self.config.base_dir)
            .field("context_count", &self.len())
            .finish()
    }
}
