//! Named-object store for ctxstore.
//!
//! A [`ContextStore`] keeps [`Value`]s in memory under string names and
//! mirrors each save to a file under its base directory, one file per
//! (name, format) pair. Memory always wins on load; disk is consulted only
//! when a name is absent from memory.
//!
//! # Formats
//!
//! - [`Format::Binary`] -- `<name>.bin`, versioned and CRC-checked, holds any value
//! - [`Format::Json`] -- `<name>.json`, human-readable, JSON-representable values only
//!
//! # Design Rules
//!
//! 1. Last write wins. No reconciliation between memory and disk.
//! 2. Disk is pruned only by `delete` (both formats) and `clear` (whole directory).
//! 3. Disk-only contexts are loadable but never listed by `list_contexts`.
//! 4. A double miss on load is an error, never a silent null.
//! 5. All I/O errors are propagated; only `delete` tolerates missing files.

pub mod config;
pub mod disk;
pub mod error;
pub mod registry;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use ctx_types::{Format, IntoFormat, Value};
pub use error::{StoreError, StoreResult};
pub use store::ContextStore;
