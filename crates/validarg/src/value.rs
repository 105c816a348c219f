//! Attribute value types.
//!
//! Host types hold statically typed fields, but a validator shared across
//! many host types needs one runtime representation. [`AttrValue`] is that
//! representation, [`ValueKind`] is its type descriptor and [`Number`] is what
//! bounds are expressed in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The kind of value an attribute holds.
///
/// Kind checks are exact: a `Bool` never satisfies an `Int` attribute and an
/// `Int` never satisfies a `Float` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// The absence of a value. Only the default of an unset attribute
    /// normally has this kind.
    Null,

    /// `true` / `false`
    Bool,

    /// Signed 64-bit integer
    Int,

    /// 64-bit float
    Float,

    /// UTF-8 string; sized by character count
    Str,

    /// List of values; sized by element count
    List,
}

impl ValueKind {
    /// Short type name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
        }
    }

    /// Whether values of this kind expose a length.
    pub fn is_sized(self) -> bool {
        matches!(self, ValueKind::Str | ValueKind::List)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric quantity, used for bounds and for the value checked against them.
///
/// Comparisons are exact across variants: an integer is never rounded to the
/// nearest float before being compared with one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    // i64 spans [-2^63, 2^63)
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(*a, *b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats read as floats
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value.into())
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// No value (the default of attributes declared without one)
    #[default]
    Null,

    /// Boolean; its quantity is `0` or `1`
    Bool(bool),

    /// Integer; bounded by its own value
    Int(i64),

    /// Float; bounded by its own value
    Float(f64),

    /// String; bounded by its character count
    Str(String),

    /// Elements are carried as-is; only the list's length is ever checked.
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// The exact kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::Null => ValueKind::Null,
            AttrValue::Bool(_) => ValueKind::Bool,
            AttrValue::Int(_) => ValueKind::Int,
            AttrValue::Float(_) => ValueKind::Float,
            AttrValue::Str(_) => ValueKind::Str,
            AttrValue::List(_) => ValueKind::List,
        }
    }

    /// Length of sized values (`Str` counts characters, `List` elements).
    pub fn len(&self) -> Option<usize> {
        match self {
            AttrValue::Str(s) => Some(s.chars().count()),
            AttrValue::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Whether this is a sized value of length zero.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// The number that bounds are checked against.
    ///
    /// - sized values: their length
    /// - `Int` / `Float`: the value itself
    /// - `Bool`: `0` or `1`
    /// - `Null`: none, bounds do not apply
    pub fn quantity(&self) -> Option<Number> {
        if let Some(len) = self.len() {
            return Some(Number::from(len));
        }
        match self {
            AttrValue::Bool(b) => Some(Number::Int(i64::from(*b))),
            AttrValue::Int(i) => Some(Number::Int(*i)),
            AttrValue::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Quoted rendering, used for strings nested in lists and choice sets.
    pub(crate) fn repr(&self) -> String {
        match self {
            AttrValue::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => f.write_str("null"),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{:?}", x),
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::List(items) => write!(f, "[{}]", join_repr(items)),
        }
    }
}

/// Comma-separated quoted rendering of a slice of values.
pub(crate) fn join_repr(values: &[AttrValue]) -> String {
    values
        .iter()
        .map(AttrValue::repr)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        AttrValue::List(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}
