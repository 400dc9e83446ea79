use ctx_types::{Format, Value};

use crate::error::CodecResult;

/// Encoder/decoder pair for one on-disk [`Format`].
///
/// Implementations are stateless and must satisfy:
/// - `decode(encode(v)) == v` for every `v` that `encode` accepts.
/// - `encode` fails instead of producing output that would not decode back
///   to the same value.
/// - `decode` never executes code or trusts embedded type information.
pub trait Codec: Send + Sync {
    /// The format this codec reads and writes.
    fn format(&self) -> Format;

    /// Encode a value into the bytes written to disk.
    fn encode(&self, value: &Value) -> CodecResult<Vec<u8>>;

    /// Decode bytes read from disk.
    fn decode(&self, bytes: &[u8]) -> CodecResult<Value>;
}
