#![forbid(unsafe_code)]

//! Tagged setting values and total scalar coercion.
//!
//! # Design
//!
//! [`SettingValue`] is the single wire and cache representation for every
//! stored setting: a tagged union over the four persistable scalars plus an
//! [`Invalid`](SettingValue::Invalid) sentinel that stands in for "absent or
//! unreadable". Every conversion to a concrete scalar is total — a
//! mismatched or invalid entry degrades to that target's zero value instead
//! of failing, so pre-existing persisted data of the wrong type never
//! surfaces as an error.
//!
//! # Invariants
//!
//! 1. Conversions never panic, for any tag × target combination.
//! 2. `Invalid` compares unequal to every concrete value (structural
//!    `PartialEq`), so an equality-gated write over an invalid placeholder
//!    always goes through.
//! 3. The serde representation is externally tagged and lowercase
//!    (`{"int": 5}`, `{"float": 5.0}`), keeping integer and float entries
//!    distinct across a JSON round trip.

use serde::{Deserialize, Serialize};

/// A tagged setting value as held in snapshots and the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingValue {
    /// 64-bit signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Absent or unreadable entry. Converts to the zero value of every
    /// scalar target.
    Invalid,
}

impl SettingValue {
    /// Coerce to an integer.
    ///
    /// Floats round to the nearest integer (saturating at the `i64` range),
    /// strings parse as decimal integers or degrade to 0, booleans map to
    /// 0/1, and `Invalid` is 0.
    #[must_use]
    pub fn as_int(&self) -> i64 {
        match self {
            SettingValue::Int(v) => *v,
            SettingValue::Float(v) => v.round() as i64,
            SettingValue::Str(s) => s.trim().parse().unwrap_or(0),
            SettingValue::Bool(b) => i64::from(*b),
            SettingValue::Invalid => 0,
        }
    }

    /// Coerce to a float.
    ///
    /// Integers cast exactly where representable, strings parse as decimal
    /// floats or degrade to 0.0, booleans map to 0.0/1.0, and `Invalid` is
    /// 0.0.
    #[must_use]
    pub fn as_float(&self) -> f64 {
        match self {
            SettingValue::Int(v) => *v as f64,
            SettingValue::Float(v) => *v,
            SettingValue::Str(s) => s.trim().parse().unwrap_or(0.0),
            SettingValue::Bool(b) => f64::from(u8::from(*b)),
            SettingValue::Invalid => 0.0,
        }
    }

    /// Coerce to a string.
    ///
    /// Numbers render in their canonical decimal form, booleans as
    /// `true`/`false`, and `Invalid` as the empty string.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            SettingValue::Int(v) => v.to_string(),
            SettingValue::Float(v) => v.to_string(),
            SettingValue::Str(s) => s.clone(),
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Invalid => String::new(),
        }
    }

    /// Coerce to a boolean.
    ///
    /// Numbers are true when nonzero. Strings are false only when empty,
    /// `"0"`, or `"false"` (case-insensitive) — the permissive reading that
    /// matches how loosely-typed stores interpret flag strings. `Invalid`
    /// is false.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            SettingValue::Int(v) => *v != 0,
            SettingValue::Float(v) => *v != 0.0,
            SettingValue::Str(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            SettingValue::Bool(b) => *b,
            SettingValue::Invalid => false,
        }
    }

    /// True for the `Invalid` sentinel.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, SettingValue::Invalid)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Float(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Str(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Str(v.to_string())
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

/// The scalar types a typed setting can take.
///
/// Implemented for exactly `i64`, `f64`, `String`, and `bool`. Every
/// generic read (`get<T>`) and every observable value in the system is
/// bounded by this trait; `from_value` is total, so typed reads inherit
/// the coerce-or-zero behavior of [`SettingValue`].
pub trait Scalar: Clone + PartialEq + Send + Sync + 'static {
    /// Coerce a tagged value to this scalar. Never fails.
    fn from_value(value: &SettingValue) -> Self;

    /// Wrap this scalar in its tagged representation.
    fn into_value(self) -> SettingValue;
}

impl Scalar for i64 {
    fn from_value(value: &SettingValue) -> Self {
        value.as_int()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self)
    }
}

impl Scalar for f64 {
    fn from_value(value: &SettingValue) -> Self {
        value.as_float()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Float(self)
    }
}

impl Scalar for String {
    fn from_value(value: &SettingValue) -> Self {
        value.as_str()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Str(self)
    }
}

impl Scalar for bool {
    fn from_value(value: &SettingValue) -> Self {
        value.as_bool()
    }

    fn into_value(self) -> SettingValue {
        SettingValue::Bool(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_coercions() {
        let v = SettingValue::Int(42);
        assert_eq!(v.as_int(), 42);
        assert_eq!(v.as_float(), 42.0);
        assert_eq!(v.as_str(), "42");
        assert!(v.as_bool());
        assert!(!SettingValue::Int(0).as_bool());
    }

    #[test]
    fn float_coercions() {
        let v = SettingValue::Float(1.5);
        assert_eq!(v.as_float(), 1.5);
        assert_eq!(v.as_int(), 2); // round to nearest
        assert_eq!(SettingValue::Float(-1.5).as_int(), -2);
        assert_eq!(v.as_str(), "1.5");
        assert!(v.as_bool());
        assert!(!SettingValue::Float(0.0).as_bool());
    }

    #[test]
    fn string_coercions() {
        assert_eq!(SettingValue::Str("17".into()).as_int(), 17);
        assert_eq!(SettingValue::Str(" 17 ".into()).as_int(), 17);
        assert_eq!(SettingValue::Str("1.5".into()).as_int(), 0);
        assert_eq!(SettingValue::Str("1.5".into()).as_float(), 1.5);
        assert_eq!(SettingValue::Str("junk".into()).as_float(), 0.0);
        assert_eq!(SettingValue::Str("hi".into()).as_str(), "hi");
    }

    #[test]
    fn string_to_bool_is_permissive() {
        assert!(SettingValue::Str("true".into()).as_bool());
        assert!(SettingValue::Str("yes".into()).as_bool());
        assert!(SettingValue::Str("1".into()).as_bool());
        assert!(!SettingValue::Str(String::new()).as_bool());
        assert!(!SettingValue::Str("0".into()).as_bool());
        assert!(!SettingValue::Str("false".into()).as_bool());
        assert!(!SettingValue::Str("FALSE".into()).as_bool());
    }

    #[test]
    fn bool_coercions() {
        assert_eq!(SettingValue::Bool(true).as_int(), 1);
        assert_eq!(SettingValue::Bool(false).as_int(), 0);
        assert_eq!(SettingValue::Bool(true).as_float(), 1.0);
        assert_eq!(SettingValue::Bool(true).as_str(), "true");
        assert_eq!(SettingValue::Bool(false).as_str(), "false");
    }

    #[test]
    fn invalid_is_zero_everywhere() {
        let v = SettingValue::Invalid;
        assert_eq!(v.as_int(), 0);
        assert_eq!(v.as_float(), 0.0);
        assert_eq!(v.as_str(), "");
        assert!(!v.as_bool());
    }

    #[test]
    fn invalid_never_equals_concrete() {
        assert_ne!(SettingValue::Invalid, SettingValue::Int(0));
        assert_ne!(SettingValue::Invalid, SettingValue::Float(0.0));
        assert_ne!(SettingValue::Invalid, SettingValue::Str(String::new()));
        assert_ne!(SettingValue::Invalid, SettingValue::Bool(false));
        assert_eq!(SettingValue::Invalid, SettingValue::Invalid);
    }

    #[test]
    fn cross_tag_inequality() {
        // Structural equality: tags must match, 5 != 5.0.
        assert_ne!(SettingValue::Int(5), SettingValue::Float(5.0));
        assert_ne!(SettingValue::Int(1), SettingValue::Bool(true));
    }

    #[test]
    fn float_to_int_saturates() {
        assert_eq!(SettingValue::Float(f64::MAX).as_int(), i64::MAX);
        assert_eq!(SettingValue::Float(f64::MIN).as_int(), i64::MIN);
        assert_eq!(SettingValue::Float(f64::NAN).as_int(), 0);
    }

    #[test]
    fn scalar_round_trip() {
        assert_eq!(i64::from_value(&42i64.into_value()), 42);
        assert_eq!(f64::from_value(&1.25f64.into_value()), 1.25);
        assert_eq!(String::from_value(&"x".to_string().into_value()), "x");
        assert!(bool::from_value(&true.into_value()));
    }

    #[test]
    fn scalar_reads_through_mismatched_tag() {
        // A typed read over the wrong tag follows the coercion table.
        assert_eq!(i64::from_value(&SettingValue::Str("9".into())), 9);
        assert_eq!(String::from_value(&SettingValue::Int(9)), "9");
        assert_eq!(f64::from_value(&SettingValue::Invalid), 0.0);
    }

    #[test]
    fn serde_tags_are_lowercase_and_distinct() {
        let int = serde_json::to_string(&SettingValue::Int(5)).unwrap();
        let float = serde_json::to_string(&SettingValue::Float(5.0)).unwrap();
        assert_eq!(int, r#"{"int":5}"#);
        assert_eq!(float, r#"{"float":5.0}"#);

        let back: SettingValue = serde_json::from_str(&int).unwrap();
        assert_eq!(back, SettingValue::Int(5));
        let back: SettingValue = serde_json::from_str(&float).unwrap();
        assert_eq!(back, SettingValue::Float(5.0));
    }

    #[test]
    fn serde_invalid_round_trips() {
        let json = serde_json::to_string(&SettingValue::Invalid).unwrap();
        let back: SettingValue = serde_json::from_str(&json).unwrap();
        assert!(back.is_invalid());
    }
}
