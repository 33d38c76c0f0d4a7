//! Name-based structural copy.
//!
//! The source is encoded to a JSON value and decoded as the target type, so
//! every field sharing a wire name and a compatible shape is carried over and
//! nothing else is. New fields on either side are picked up without touching
//! the mapping code; a shared name with an incompatible shape fails loudly.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};

/// Top-level type meta keys, owned by the target type's own serialiser.
const TYPE_META_KEYS: [&str; 2] = ["apiVersion", "kind"];

pub fn copy<S, T>(src: &S) -> ConversionResult<T>
where
    S: Serialize,
    T: DeserializeOwned,
{
    let target = std::any::type_name::<T>();
    let mut v = serde_json::to_value(src)
        .map_err(|e| ConversionError::StructuralMismatch { target, reason: format!("encoding source: {e}") })?;
    if let Value::Object(map) = &mut v {
        for key in TYPE_META_KEYS {
            map.remove(key);
        }
    }
    serde_json::from_value(v).map_err(|e| ConversionError::StructuralMismatch { target, reason: e.to_string() })
}

/// Go-style zero check on an encoded value: null, false, 0, "" and
/// containers holding only zero values.
pub fn is_zero(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.values().all(is_zero),
    }
}
