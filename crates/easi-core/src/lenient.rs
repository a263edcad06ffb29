//! Forgiving deserializers for facility input.
//!
//! Numeric fields accept a number, a numeric string, `null` or nothing at
//! all. Non-numeric and non-finite values count as missing and take the
//! field's default.
//!
//! [`serialize_extended`] and [`deserialize_extended`] carry derived values
//! that may legitimately be infinite through JSON, which has no literal for
//! them.

use crate::task::TimingLocation;
use crate::F;
use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(F),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Number(F),
    Other(IgnoredAny),
}

/// Parse a numeric field, `None` when missing or unusable.
pub fn number<'de, D>(deserializer: D) -> Result<Option<F>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(x) => Some(x),
        RawNumber::Text(s) => s.trim().parse::<F>().ok(),
        RawNumber::Other(_) => None,
    };
    Ok(value.filter(|x| x.is_finite()))
}

pub fn or_zero<'de, D>(deserializer: D) -> Result<F, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(0.0))
}

pub fn or_one<'de, D>(deserializer: D) -> Result<F, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(1.0))
}

pub fn one() -> F {
    1.0
}

/// Trimmed text; numbers are rendered, everything else becomes empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawText::deserialize(deserializer)? {
        RawText::Text(s) => s.trim().to_string(),
        RawText::Integer(i) => i.to_string(),
        RawText::Number(x) => x.to_string(),
        RawText::Other(_) => String::new(),
    })
}

/// Timing location; blank means Beginning, unrecognised means End.
pub fn timing<'de, D>(deserializer: D) -> Result<TimingLocation, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = text(deserializer)?;
    if raw.is_empty() {
        return Ok(TimingLocation::default());
    }
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(location = %raw, "unrecognised timing location, using End");
        TimingLocation::End
    }))
}

/// Finite values as JSON numbers; infinities and NaN as `"inf"`, `"-inf"`, `"nan"`.
pub fn serialize_extended<S>(x: &F, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if x.is_finite() {
        serializer.serialize_f64(*x)
    } else if x.is_nan() {
        serializer.serialize_str("nan")
    } else if x.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

/// Inverse of [`serialize_extended`]. Also accepts plain numeric strings.
pub fn deserialize_extended<'de, D>(deserializer: D) -> Result<F, D::Error>
where
    D: Deserializer<'de>,
{
    match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(x) => Ok(x),
        RawNumber::Text(s) => s
            .trim()
            .parse::<F>()
            .map_err(|_| D::Error::custom(format!("expected a number, \"inf\", \"-inf\" or \"nan\", got {:?}", s))),
        RawNumber::Other(_) => Err(D::Error::custom("expected a number, \"inf\", \"-inf\" or \"nan\"")),
    }
}
