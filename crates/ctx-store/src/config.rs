use std::path::{Path, PathBuf};

use ctx_types::Format;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Directory used when no base directory is configured.
pub const DEFAULT_BASE_DIR: &str = "object_saver_files";

/// Configuration for a [`ContextStore`](crate::ContextStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one file per (context, format). Every file in it is
    /// removed by `clear`, so it must not be shared with unrelated data.
    pub base_dir: PathBuf,
    /// Format used by `save_default` / `load_default`.
    pub default_format: Format,
    /// When `true`, `open` creates `base_dir` if it is missing. Otherwise a
    /// missing directory surfaces as an I/O error on the first file write.
    pub create_dir: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            default_format: Format::Binary,
            create_dir: false,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_default_format(mut self, format: Format) -> Self {
        self.default_format = format;
        self
    }

    pub fn with_create_dir(mut self, create: bool) -> Self {
        self.create_dir = create;
        self
    }
}
