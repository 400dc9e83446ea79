//! Serialization codecs for ctxstore.
//!
//! One [`Codec`] exists per [`Format`]. Codecs are resolved through a static
//! lookup table indexed by [`Format::index`] rather than by matching on
//! format names.
//!
//! - [`BinaryCodec`] -- versioned, CRC-checked envelope around a bincode payload
//! - [`JsonCodec`] -- JSON text with `", "` / `": "` separators

pub mod binary;
pub mod error;
pub mod json;
pub mod traits;

pub use binary::BinaryCodec;
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;
pub use traits::Codec;

use ctx_types::Format;

static CODECS: [&dyn Codec; 2] = [&BinaryCodec, &JsonCodec];

/// The codec responsible for `format`.
pub fn codec_for(format: Format) -> &'static dyn Codec {
    CODECS[format.index()]
}
