//! Foundation types for ctxstore.
//!
//! Every other ctxstore crate depends on `ctx-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Dynamic, self-describing object held by the store
//! - [`Format`] — Closed set of on-disk serialization formats
//! - [`IntoFormat`] — Accepts either a [`Format`] or a format name

pub mod error;
pub mod format;
pub mod value;

pub use error::TypeError;
pub use format::{Format, IntoFormat};
pub use value::{Value, MAX_JSON_DEPTH};
