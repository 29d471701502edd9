//! Forgiving deserializers for catalog records.
//!
//! The product collaborator serialises straight from SQL rows, so integers
//! may arrive as JSON numbers or as strings such as `"65"` or `"850W"`.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Parse the leading (optionally signed) integer of a string, ignoring any
/// trailing unit suffix.
pub(crate) fn leading_int(s: &str) -> Option<i64> {
    let t = s.trim();
    let end = t
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(t.len());
    t[..end].parse().ok()
}

fn int_from_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

pub(crate) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = Value::deserialize(d)?;
    int_from_value(&v).ok_or_else(|| D::Error::custom(format!("expected an integer, found {v}")))
}

pub(crate) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let n = int(d)?;
    u64::try_from(n).map_err(|_| D::Error::custom(format!("invalid part id {n}")))
}

pub(crate) fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref()
        .and_then(int_from_value)
        .and_then(|n| u32::try_from(n).ok()))
}

pub(crate) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Parse an optional string field through `FromStr`, dropping values that
/// don't parse.
pub(crate) fn opt_parsed<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    Ok(opt_string(d)?.and_then(|s| s.parse().ok()))
}
