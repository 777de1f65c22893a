//! Key-value documents holding source and position metadata.
//!
//! A [`Document`] is a JSON object whose fields keep their insertion order.
//! Equality ignores that order, but comparisons walk the fields of the
//! left-hand document in the order they were written, so the first field
//! recorded by a connector is the most significant one.

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// An ordered set of named JSON values.
///
/// Equality is structural and type-sensitive: `{"id": 3}` and `{"id": 3.0}`
/// are different documents, even though ordering comparisons treat the two
/// numbers as equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, returning the document.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compare every field of both documents.
    ///
    /// Fields are visited in this document's order. A field that the other
    /// document lacks makes this document greater; otherwise the first
    /// differing value decides, and the field count breaks remaining ties.
    pub fn compare_to(&self, other: &Document) -> Result<Ordering> {
        compare_maps(&self.0, &other.0)
    }

    /// Compare only the fields present in both documents.
    ///
    /// Fields unique to either side are ignored, so two positions that differ
    /// only in fields one of them lacks compare as equal.
    pub fn compare_using_similar_fields(&self, other: &Document) -> Result<Ordering> {
        for (name, value) in &self.0 {
            if let Some(that) = other.0.get(name) {
                match compare_values(name, value, that)? {
                    Ordering::Equal => continue,
                    decided => return Ok(decided),
                }
            }
        }
        Ok(Ordering::Equal)
    }

    /// Compare the named fields in the given order, skipping any field that is
    /// missing from either document.
    pub fn compare_on_fields<S: AsRef<str>>(
        &self,
        other: &Document,
        fields: &[S],
    ) -> Result<Ordering> {
        for name in fields {
            let name = name.as_ref();
            if let (Some(this), Some(that)) = (self.0.get(name), other.0.get(name)) {
                match compare_values(name, this, that)? {
                    Ordering::Equal => continue,
                    decided => return Ok(decided),
                }
            }
        }
        Ok(Ordering::Equal)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidRecord(format!(
                "expected a JSON object, got {}",
                kind(&other)
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn compare_maps(left: &Map<String, Value>, right: &Map<String, Value>) -> Result<Ordering> {
    for (name, value) in left {
        let Some(that) = right.get(name) else {
            return Ok(Ordering::Greater);
        };
        match compare_values(name, value, that)? {
            Ordering::Equal => continue,
            decided => return Ok(decided),
        }
    }
    Ok(left.len().cmp(&right.len()))
}

fn compare_values(field: &str, left: &Value, right: &Value) -> Result<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, _) => Ok(Ordering::Less),
        (_, Value::Null) => Ok(Ordering::Greater),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Ok(compare_numbers(a, b)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                match compare_values(field, x, y)? {
                    Ordering::Equal => continue,
                    decided => return Ok(decided),
                }
            }
            Ok(a.len().cmp(&b.len()))
        }
        (Value::Object(a), Value::Object(b)) => compare_maps(a, b),
        _ => Err(Error::Incomparable {
            field: field.to_string(),
            left: kind(left).to_string(),
            right: kind(right).to_string(),
        }),
    }
}

enum Numeric {
    Int(i128),
    Float(f64),
}

fn numeric(n: &Number) -> Numeric {
    if let Some(i) = n.as_i64() {
        Numeric::Int(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Numeric::Int(i128::from(u))
    } else {
        // JSON numbers are always finite
        Numeric::Float(n.as_f64().unwrap_or_default())
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Numeric::Int(x), Numeric::Int(y)) => x.cmp(&y),
        (Numeric::Float(x), Numeric::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Numeric::Int(x), Numeric::Float(y)) => compare_int_float(x, y),
        (Numeric::Float(x), Numeric::Int(y)) => compare_int_float(y, x).reverse(),
    }
}

/// Exact comparison of an integer against a finite float, without rounding
/// the integer through `f64`.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    let whole = float.trunc();
    // Integers from JSON stay within +/- 2^64
    if whole >= 1.0e20 {
        return Ordering::Less;
    }
    if whole <= -1.0e20 {
        return Ordering::Greater;
    }
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => {
            let fraction = float - whole;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        decided => decided,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::try_from(value).unwrap()
    }

    #[test]
    fn equality_ignores_field_order() {
        let a = doc(json!({"server": "db1", "file": "binlog.0001"}));
        let b = doc(json!({"file": "binlog.0001", "server": "db1"}));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_requires_same_fields() {
        let a = doc(json!({"server": "db1"}));
        let b = doc(json!({"server": "db1", "shard": 2}));
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn equality_is_deep() {
        let a = doc(json!({"server": {"name": "db1", "id": 7}}));
        let b = doc(json!({"server": {"id": 7, "name": "db1"}}));
        let c = doc(json!({"server": {"id": 8, "name": "db1"}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn similar_fields_ignores_unshared_fields() {
        let a = doc(json!({"lsn": 5}));
        let b = doc(json!({"lsn": 5, "extra": "x"}));
        assert_eq!(a.compare_using_similar_fields(&b), Ok(Ordering::Equal));
        assert_eq!(b.compare_using_similar_fields(&a), Ok(Ordering::Equal));
    }

    #[test]
    fn similar_fields_uses_first_differing_field() {
        let a = doc(json!({"file": "binlog.0002", "pos": 4}));
        let b = doc(json!({"file": "binlog.0001", "pos": 900}));
        assert_eq!(a.compare_using_similar_fields(&b), Ok(Ordering::Greater));
        assert_eq!(b.compare_using_similar_fields(&a), Ok(Ordering::Less));
    }

    #[test]
    fn similar_fields_with_nothing_shared_is_equal() {
        let a = doc(json!({"lsn": 1}));
        let b = doc(json!({"scn": 99}));
        assert_eq!(a.compare_using_similar_fields(&b), Ok(Ordering::Equal));
    }

    #[test]
    fn full_compare_counts_missing_fields() {
        let a = doc(json!({"lsn": 5}));
        let b = doc(json!({"lsn": 5, "extra": "x"}));
        assert_eq!(a.compare_to(&b), Ok(Ordering::Less));
        assert_eq!(b.compare_to(&a), Ok(Ordering::Greater));
        assert_eq!(a.compare_to(&a), Ok(Ordering::Equal));
    }

    #[test]
    fn numbers_compare_across_representations() {
        let small = doc(json!({"n": -1}));
        let float = doc(json!({"n": 2.5}));
        let big = doc(json!({"n": u64::MAX}));
        assert_eq!(small.compare_to(&float), Ok(Ordering::Less));
        assert_eq!(float.compare_to(&big), Ok(Ordering::Less));
        assert_eq!(big.compare_to(&small), Ok(Ordering::Greater));
        assert_eq!(small.compare_to(&big), Ok(Ordering::Less));
        assert_eq!(
            doc(json!({"n": 3})).compare_to(&doc(json!({"n": 3.0}))),
            Ok(Ordering::Equal)
        );
    }

    #[test]
    fn signed_zero_is_zero() {
        let int_zero = doc(json!({"lsn": 0}));
        let neg_zero = doc(json!({"lsn": -0.0}));
        let pos_zero = doc(json!({"lsn": 0.0}));
        assert_eq!(int_zero.compare_to(&neg_zero), Ok(Ordering::Equal));
        assert_eq!(neg_zero.compare_to(&int_zero), Ok(Ordering::Equal));
        assert_eq!(neg_zero.compare_to(&pos_zero), Ok(Ordering::Equal));
    }

    #[test]
    fn large_integers_compare_exactly_against_floats() {
        let two_53: u64 = 1 << 53;
        let int_after = doc(json!({"lsn": two_53 + 1}));
        let float_at = doc(json!({"lsn": two_53 as f64}));
        assert_eq!(int_after.compare_to(&float_at), Ok(Ordering::Greater));
        assert_eq!(float_at.compare_to(&int_after), Ok(Ordering::Less));

        let int_at = doc(json!({"lsn": two_53}));
        assert_eq!(int_at.compare_to(&float_at), Ok(Ordering::Equal));

        let big = doc(json!({"lsn": u64::MAX}));
        let huge_float = doc(json!({"lsn": 1.0e30}));
        assert_eq!(big.compare_to(&huge_float), Ok(Ordering::Less));
        let small = doc(json!({"lsn": i64::MIN}));
        let tiny_float = doc(json!({"lsn": -1.0e30}));
        assert_eq!(small.compare_to(&tiny_float), Ok(Ordering::Greater));
    }

    #[test]
    fn fractions_break_integer_ties() {
        let int = doc(json!({"ts": -3}));
        assert_eq!(int.compare_to(&doc(json!({"ts": -3.5}))), Ok(Ordering::Greater));
        assert_eq!(int.compare_to(&doc(json!({"ts": -2.5}))), Ok(Ordering::Less));
        assert_eq!(int.compare_to(&doc(json!({"ts": -3.0}))), Ok(Ordering::Equal));
    }

    #[test]
    fn equality_is_type_sensitive_but_ordering_is_not() {
        let int = doc(json!({"id": 3}));
        let float = doc(json!({"id": 3.0}));
        assert_ne!(int, float);
        assert_eq!(int.compare_to(&float), Ok(Ordering::Equal));
    }

    #[test]
    fn null_sorts_first() {
        let a = doc(json!({"snapshot": null}));
        let b = doc(json!({"snapshot": false}));
        assert_eq!(a.compare_using_similar_fields(&b), Ok(Ordering::Less));
        assert_eq!(b.compare_using_similar_fields(&a), Ok(Ordering::Greater));
    }

    #[test]
    fn arrays_compare_elementwise() {
        let a = doc(json!({"gtids": [1, 2]}));
        let b = doc(json!({"gtids": [1, 2, 0]}));
        let c = doc(json!({"gtids": [1, 3]}));
        assert_eq!(a.compare_to(&b), Ok(Ordering::Less));
        assert_eq!(c.compare_to(&b), Ok(Ordering::Greater));
    }

    #[test]
    fn mismatched_kinds_are_incomparable() {
        let a = doc(json!({"lsn": "0/16B3748"}));
        let b = doc(json!({"lsn": 42}));
        assert_eq!(
            a.compare_using_similar_fields(&b),
            Err(Error::Incomparable {
                field: "lsn".into(),
                left: "string".into(),
                right: "number".into(),
            })
        );
    }

    #[test]
    fn compare_on_named_fields() {
        let a = doc(json!({"txId": 9, "lsn": 1}));
        let b = doc(json!({"txId": 2, "lsn": 3}));
        assert_eq!(a.compare_on_fields(&b, &["lsn", "txId"]), Ok(Ordering::Less));
        assert_eq!(a.compare_on_fields(&b, &["txId"]), Ok(Ordering::Greater));
        assert_eq!(a.compare_on_fields(&b, &["missing"]), Ok(Ordering::Equal));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Document::try_from(json!([1, 2])),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn display_renders_json_in_insertion_order() {
        let d = Document::new().with("file", "binlog.0001").with("pos", 154);
        assert_eq!(d.to_string(), r#"{"file":"binlog.0001","pos":154}"#);
    }
}
