//! Total conversions from loosely-typed JSON into typed fields.
//!
//! Every helper has a defined fallback, so a malformed value degrades to a
//! default instead of failing the whole migration.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

pub type Object = Map<String, Value>;

/// Convert `value` to a finite number, or return `default`.
///
/// Numbers and numeric strings are accepted; NaN, infinities, booleans,
/// nulls, arrays and objects all fall back to `default`.
pub fn to_finite_number(value: Option<&Value>, default: f64) -> f64 {
    to_optional_number(value).unwrap_or(default)
}

/// Like [`to_finite_number`], but keeps "no value" distinguishable.
/// Blank strings count as no value.
pub fn to_optional_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// String fields: anything that is not a JSON string becomes `""`.
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Date fields: like [`to_text`], but whole non-negative numbers are kept as
/// their digits so spreadsheet serial dates reach the date normalizer.
pub fn to_date_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(serial) => serial.to_string(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| format!("{f:.0}"))
                .unwrap_or_default(),
        },
        other => to_text(other),
    }
}

/// Identifier-like fields: non-blank strings (trimmed) or numbers.
pub fn to_identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-null field among `names`. Used to accept older field names.
pub fn field<'a>(obj: &'a Object, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| !value.is_null())
}

/// Object-valued field, if it is one.
pub fn object<'a>(obj: &'a Object, name: &str) -> Option<&'a Object> {
    obj.get(name).and_then(Value::as_object)
}

/// Normalize a row collection.
///
/// Non-arrays give an empty collection and non-object entries are dropped.
/// Each surviving row keeps its id if it is valid and not already taken by
/// an earlier row; otherwise it gets the lowest free `prefix-N`.
pub fn rows<T>(value: Option<&Value>, prefix: &str, build: impl Fn(&Object, String) -> T) -> Vec<T> {
    let objects: Vec<&Object> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default();

    let mut taken: HashSet<String> = HashSet::with_capacity(objects.len());
    let kept: Vec<Option<String>> = objects
        .iter()
        .map(|obj| to_identifier(obj.get("id")).filter(|id| taken.insert(id.clone())))
        .collect();

    let mut backfilled = 0usize;
    let mut sequence = 1usize;
    let result: Vec<T> = objects
        .iter()
        .zip(kept)
        .map(|(obj, id)| {
            let id = id.unwrap_or_else(|| {
                backfilled += 1;
                next_free_id(prefix, &mut sequence, &mut taken)
            });
            build(obj, id)
        })
        .collect();

    if backfilled > 0 {
        debug!(prefix, backfilled, "backfilled missing or duplicate row ids");
    }
    result
}

/// Lowest `prefix-N` (N >= `*sequence`) not in `taken`; marks it taken.
pub fn next_free_id(prefix: &str, sequence: &mut usize, taken: &mut HashSet<String>) -> String {
    loop {
        let candidate = format!("{prefix}-{sequence}");
        *sequence += 1;
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}
