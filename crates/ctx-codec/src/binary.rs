use ctx_types::{Format, Value};

use crate::error::{CodecError, CodecResult};
use crate::traits::Codec;

/// Magic bytes at the start of every binary file.
pub const MAGIC: &[u8; 4] = b"CTXB";

/// Current envelope version.
pub const VERSION: u32 = 1;

/// Header size: 4 bytes magic + 4 bytes version + 4 bytes CRC.
pub const HEADER_SIZE: usize = 12;

/// Binary codec.
///
/// On-disk format:
/// ```text
/// [4 bytes: magic "CTXB"]
/// [4 bytes: version (big-endian u32)]
/// [4 bytes: CRC32 of payload (big-endian u32)]
/// [N bytes: payload (bincode-serialized Value)]
/// ```
///
/// The payload is a tagged encoding of the [`Value`] tree with
/// length-prefixed strings, byte arrays and collections. Decoding only ever
/// produces a `Value`; nothing in the file is executed. A torn write is
/// caught by the CRC before the payload is decoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn format(&self) -> Format {
        Format::Binary
    }

    fn encode(&self, value: &Value) -> CodecResult<Vec<u8>> {
        let payload =
            bincode::serialize(value).map_err(|e| CodecError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(&payload);

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_be_bytes());
        out.extend_from_slice(&crc.to_be_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Value> {
        if bytes.len() < HEADER_SIZE {
            return Err(CodecError::Truncated {
                len: bytes.len(),
                min: HEADER_SIZE,
            });
        }
        if &bytes[0..4] != MAGIC {
            return Err(CodecError::InvalidMagic {
                expected: String::from_utf8_lossy(MAGIC).into(),
                actual: String::from_utf8_lossy(&bytes[0..4]).into(),
            });
        }
        let version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let expected = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let payload = &bytes[HEADER_SIZE..];
        let computed = crc32fast::hash(payload);
        if computed != expected {
            return Err(CodecError::ChecksumMismatch { expected, computed });
        }

        bincode::deserialize(payload).map_err(|e| CodecError::Serialization(e.to_string()))
    }
}
