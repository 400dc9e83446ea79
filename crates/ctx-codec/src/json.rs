use std::io;

use ctx_types::{Format, Value};
use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::{CodecError, CodecResult};
use crate::traits::Codec;

/// JSON text codec.
///
/// Only values built from null, bools, integers, finite floats, strings,
/// lists and maps with unique string keys, nested at most
/// [`MAX_JSON_DEPTH`](ctx_types::MAX_JSON_DEPTH) levels, can be encoded.
/// Anything else fails before a single byte is produced. Map order is preserved in both directions.
///
/// Output is a single line with `", "` between items and `": "` after keys,
/// e.g. `{"a": 1, "b": [1, 2]}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, value: &Value) -> CodecResult<Vec<u8>> {
        let json = serde_json::Value::try_from(value)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;

        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        json.serialize(&mut ser)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Value> {
        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| CodecError::Serialization(e.to_string()))?;
        Ok(Value::from(json))
    }
}

/// Compact formatter with a space after each `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctx_types::MAX_JSON_DEPTH;

    fn encode_str(value: &Value) -> String {
        String::from_utf8(JsonCodec.encode(value).unwrap()).unwrap()
    }

    #[test]
    fn spaced_separators() {
        assert_eq!(encode_str(&Value::object([("a", 1)])), r#"{"a": 1}"#);
        let v = Value::object([
            ("b", Value::List(vec![Value::from(1), Value::from(2)])),
            ("a", Value::Null),
        ]);
        assert_eq!(encode_str(&v), r#"{"b": [1, 2], "a": null}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(encode_str(&Value::List(vec![])), "[]");
        assert_eq!(encode_str(&Value::Map(vec![])), "{}");
    }

    #[test]
    fn floats_keep_fraction() {
        assert_eq!(encode_str(&Value::Float(3.0)), "3.0");
        assert_eq!(JsonCodec.decode(b"3.0").unwrap(), Value::Float(3.0));
        assert_eq!(JsonCodec.decode(b"3").unwrap(), Value::Int(3));
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(encode_str(&Value::from("a\"b\n")), r#""a\"b\n""#);
    }

    #[test]
    fn decode_preserves_key_order() {
        let v = JsonCodec.decode(br#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = v
            .as_map()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn bytes_rejected() {
        let err = JsonCodec.encode(&Value::bytes(vec![1, 2])).unwrap_err();
        assert!(matches!(err, CodecError::Serialization(_)));
    }

    #[test]
    fn integer_keys_rejected() {
        let v = Value::Map(vec![(Value::Int(1), Value::from("one"))]);
        let err = JsonCodec.encode(&v).unwrap_err();
        assert!(err.to_string().contains("map key of type int"));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let v = Value::Map(vec![
            (Value::from("k"), Value::from(1)),
            (Value::from("k"), Value::from(2)),
        ]);
        let err = JsonCodec.encode(&v).unwrap_err();
        assert!(err.to_string().contains("duplicate map key"));
    }

    fn nested_lists(levels: usize) -> Value {
        (0..levels).fold(Value::Null, |inner, _| Value::List(vec![inner]))
    }

    #[test]
    fn nesting_at_limit_roundtrips() {
        let v = nested_lists(MAX_JSON_DEPTH);
        let bytes = JsonCodec.encode(&v).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn nesting_past_limit_rejected() {
        let err = JsonCodec.encode(&nested_lists(MAX_JSON_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, CodecError::Serialization(_)));

        // The decoder refuses the same depth, so encode must not produce it.
        let text = format!(
            "{}null{}",
            "[".repeat(MAX_JSON_DEPTH + 1),
            "]".repeat(MAX_JSON_DEPTH + 1)
        );
        assert!(JsonCodec.decode(text.as_bytes()).is_err());
    }

    #[test]
    fn nan_rejected() {
        assert!(JsonCodec.encode(&Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn malformed_input_rejected() {
        let err = JsonCodec.decode(b"{\"a\": ").unwrap_err();
        assert!(matches!(err, CodecError::Serialization(_)));
    }
}
