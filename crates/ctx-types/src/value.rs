use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A dynamically typed object held by the store.
///
/// `Value` is the unit of storage: the registry keeps values in memory and
/// the codecs mirror them to disk. Maps are ordered association lists whose
/// keys may be any `Value`, which is richer than JSON allows. The JSON format
/// rejects such values at encode time; the binary format can hold all of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    /// Ordered key/value pairs. Insertion order is preserved.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Build a string-keyed map from `(key, value)` pairs, keeping their order.
    pub fn object<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Self::Str(k.into()), v.into()))
                .collect(),
        )
    }

    /// Wrap raw bytes.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Short name of this value's variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: integers are widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a string key in a map. Returns the last matching entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if this value can be written in the JSON format.
    pub fn is_json_representable(&self) -> bool {
        serde_json::Value::try_from(self).is_ok()
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

// ---------------------------------------------------------------------------
// Conversions from Rust values
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// JSON bridge
// ---------------------------------------------------------------------------

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 above i64::MAX, or a float. as_f64 is total for both.
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (Self::Str(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Deepest list/map nesting that JSON text can hold and still be parsed back.
///
/// `serde_json` refuses input nested 128 levels or more.
pub const MAX_JSON_DEPTH: usize = 127;

impl TryFrom<&Value> for serde_json::Value {
    type Error = TypeError;

    /// Fails for bytes, non-string or duplicate map keys, non-finite floats,
    /// and nesting deeper than [`MAX_JSON_DEPTH`].
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        to_json(value, 0)
    }
}

fn to_json(value: &Value, depth: usize) -> Result<serde_json::Value, TypeError> {
    use serde_json::Value as Json;

    if matches!(value, Value::List(_) | Value::Map(_)) && depth >= MAX_JSON_DEPTH {
        return Err(TypeError::NotRepresentable(format!(
            "nesting deeper than {MAX_JSON_DEPTH} levels"
        )));
    }
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| TypeError::NotRepresentable(format!("non-finite float {f}")))?,
        Value::Str(s) => Json::String(s.clone()),
        Value::Bytes(b) => {
            return Err(TypeError::NotRepresentable(format!(
                "bytes value of length {}",
                b.len()
            )))
        }
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|item| to_json(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Map(pairs) => {
            let mut map = serde_json::Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                let key = k.as_str().ok_or_else(|| {
                    TypeError::NotRepresentable(format!("map key of type {}", k.kind()))
                })?;
                if map.insert(key.to_string(), to_json(v, depth + 1)?).is_some() {
                    return Err(TypeError::NotRepresentable(format!(
                        "duplicate map key {key:?}"
                    )));
                }
            }
            Json::Object(map)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            (-1e12f64..1e12).prop_map(Value::Float),
            "[a-z0-9 ]{0,8}".prop_map(Value::Str),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::object(m)),
            ]
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[test]
    fn object_preserves_order() {
        let v = Value::object([("z", 1), ("a", 2)]);
        let keys: Vec<_> = v
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn get_returns_last_duplicate() {
        let v = Value::Map(vec![
            (Value::from("k"), Value::from(1)),
            (Value::from("k"), Value::from(2)),
        ]);
        assert_eq!(v.get("k"), Some(&Value::Int(2)));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::Int(3).get("k"), None);
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Int(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(1.5).as_i64(), None);
        assert_eq!(Value::from("x").as_f64(), None);
    }

    #[test]
    fn option_and_iterator_conversions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("s")), Value::Str("s".into()));
        let list: Value = (1..=3).map(Value::from).collect();
        assert_eq!(list.as_list().map(<[Value]>::len), Some(3));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::bytes(vec![1]).kind(), "bytes");
        assert_eq!(Value::object([("a", 1)]).kind(), "map");
    }

    // -----------------------------------------------------------------------
    // JSON bridge
    // -----------------------------------------------------------------------

    #[test]
    fn from_json_maps_numbers() {
        let v = Value::from(json!({"i": 1, "f": 2.5, "big": u64::MAX}));
        assert_eq!(v.get("i"), Some(&Value::Int(1)));
        assert_eq!(v.get("f"), Some(&Value::Float(2.5)));
        assert_eq!(v.get("big"), Some(&Value::Float(u64::MAX as f64)));
    }

    #[test]
    fn bytes_not_representable() {
        let err = serde_json::Value::try_from(&Value::bytes(b"abc".to_vec())).unwrap_err();
        assert!(matches!(err, TypeError::NotRepresentable(_)));
    }

    #[test]
    fn non_string_key_not_representable() {
        let v = Value::Map(vec![(Value::Int(1), Value::Null)]);
        let err = serde_json::Value::try_from(&v).unwrap_err();
        assert_eq!(err, TypeError::NotRepresentable("map key of type int".into()));
    }

    #[test]
    fn non_finite_float_not_representable() {
        assert!(!Value::Float(f64::NAN).is_json_representable());
        assert!(!Value::List(vec![Value::Float(f64::INFINITY)]).is_json_representable());
        assert!(Value::Float(0.5).is_json_representable());
    }

    #[test]
    fn duplicate_keys_not_representable() {
        let v = Value::Map(vec![
            (Value::from("k"), Value::from(1)),
            (Value::from("k"), Value::from(2)),
        ]);
        let err = serde_json::Value::try_from(&v).unwrap_err();
        assert_eq!(err, TypeError::NotRepresentable("duplicate map key \"k\"".into()));
    }

    #[test]
    fn nesting_limit() {
        fn nested(levels: usize) -> Value {
            (0..levels).fold(Value::Null, |inner, _| Value::List(vec![inner]))
        }
        assert!(nested(MAX_JSON_DEPTH).is_json_representable());
        assert!(!nested(MAX_JSON_DEPTH + 1).is_json_representable());

        let deep_map = (0..MAX_JSON_DEPTH + 1).fold(Value::Null, |inner, _| {
            Value::object([("k", inner)])
        });
        assert!(!deep_map.is_json_representable());
    }

    #[test]
    fn nested_unrepresentable_is_detected() {
        let v = Value::object([("inner", Value::List(vec![Value::bytes(vec![0])]))]);
        assert!(!v.is_json_representable());
    }

    proptest! {
        #[test]
        fn json_bridge_roundtrip(v in arb_json_value()) {
            let json = serde_json::Value::try_from(&v).unwrap();
            prop_assert_eq!(Value::from(json), v);
        }
    }
}
