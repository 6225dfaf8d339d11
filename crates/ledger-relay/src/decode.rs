//! Binary record decoder
//!
//! Thin wrapper over the CBOR codec: one opaque payload in, one [`Value`]
//! tree out. There is no partial-decode recovery — a malformed payload
//! fails this record only, and the driver decides what to do with it
//! (skip-and-continue).
//!
//! Mapping from CBOR to the value tree:
//! - tag 0 (RFC 3339 text) and tag 1 (epoch seconds) become `Timestamp`
//! - tag 4 (decimal fraction) becomes `Decimal`
//! - byte strings become `Blob`
//! - unknown tags are transparently unwrapped
//! - only text map keys name fields; non-text keys are dropped

use crate::error::{RelayError, Result};
use crate::value::Value;
use chrono::{DateTime, Utc};
use ciborium::value::Value as CborValue;
use std::collections::HashMap;

const TAG_TIMESTAMP_TEXT: u64 = 0;
const TAG_TIMESTAMP_EPOCH: u64 = 1;
const TAG_DECIMAL_FRACTION: u64 = 4;

/// Decode one payload into a value tree.
///
/// Fails with [`RelayError::MalformedPayload`] when the bytes are not a
/// valid instance of the encoding.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let raw: CborValue =
        ciborium::de::from_reader(bytes).map_err(|e| RelayError::malformed(e.to_string()))?;
    Ok(convert(raw))
}

fn convert(raw: CborValue) -> Value {
    match raw {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(b),
        CborValue::Integer(i) => {
            let wide = i128::from(i);
            match i64::try_from(wide) {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Decimal(wide as f64),
            }
        }
        CborValue::Float(f) => Value::Decimal(f),
        CborValue::Text(s) => Value::Text(s),
        CborValue::Bytes(b) => Value::Blob(b),
        CborValue::Array(items) => Value::List(items.into_iter().map(convert).collect()),
        CborValue::Map(entries) => {
            let mut fields = HashMap::with_capacity(entries.len());
            for (key, val) in entries {
                if let CborValue::Text(name) = key {
                    fields.insert(name, convert(val));
                }
            }
            Value::Struct(fields)
        }
        CborValue::Tag(tag, inner) => convert_tagged(tag, *inner),
        // ciborium's Value is non_exhaustive
        _ => Value::Null,
    }
}

fn convert_tagged(tag: u64, inner: CborValue) -> Value {
    match (tag, inner) {
        (TAG_TIMESTAMP_TEXT, CborValue::Text(s)) => match DateTime::parse_from_rfc3339(&s) {
            Ok(ts) => Value::Timestamp(ts.with_timezone(&Utc)),
            Err(_) => Value::Text(s),
        },
        (TAG_TIMESTAMP_EPOCH, CborValue::Integer(i)) => {
            match i64::try_from(i128::from(i)).ok().and_then(|secs| DateTime::from_timestamp(secs, 0)) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::Int(i64::try_from(i128::from(i)).unwrap_or(i64::MAX)),
            }
        }
        (TAG_TIMESTAMP_EPOCH, CborValue::Float(f)) => {
            match DateTime::from_timestamp_millis((f * 1000.0) as i64) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::Decimal(f),
            }
        }
        (TAG_DECIMAL_FRACTION, CborValue::Array(parts)) => decimal_fraction(parts),
        (_, inner) => convert(inner),
    }
}

/// Decimal fraction: `[exponent, mantissa]` meaning `mantissa * 10^exponent`.
fn decimal_fraction(parts: Vec<CborValue>) -> Value {
    let mut ints = parts.iter().map(|p| match p {
        CborValue::Integer(i) => i64::try_from(i128::from(*i)).ok(),
        _ => None,
    });
    match (ints.next().flatten(), ints.next().flatten()) {
        (Some(exponent), Some(mantissa)) => {
            Value::Decimal(mantissa as f64 * 10f64.powi(exponent as i32))
        }
        _ => Value::List(parts.into_iter().map(convert).collect()),
    }
}
