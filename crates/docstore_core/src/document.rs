//! Document model: field types, field values and documents.
//!
//! A [`Document`] maps field names to [`Field`] values. Every field carries
//! its type in the enum variant itself, so the declared [`FieldType`] and
//! the runtime value cannot drift apart.
//!
//! Numbers use a single canonical kind, [`Number`]: an exact `i64` when the
//! value is integral and fits, otherwise a finite `f64`. Two numbers are
//! equal when they are numerically equal, so `25` and `25.0` compare equal
//! regardless of which path produced them.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// The type tag of a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text.
    String,
    /// Numeric value.
    Number,
    /// Boolean value.
    Bool,
}

impl FieldType {
    /// Returns the lowercase name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum NumberRepr {
    Int(i64),
    Float(f64),
}

/// The canonical numeric value of a document field.
///
/// Integral values are held exactly as `i64`; anything else is a finite
/// `f64` (precision limited to 53 bits of mantissa). Non-finite floats
/// cannot be represented.
#[derive(Debug, Clone, Copy)]
pub struct Number(NumberRepr);

impl Number {
    /// Creates a number from an integer.
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        Self(NumberRepr::Int(value))
    }

    /// Creates a number from a float.
    ///
    /// Returns `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(NumberRepr::Float(value)))
    }

    /// Returns the value as an `i64` if it is an exact integer in range.
    ///
    /// A float with a fractional part, or one outside the `i64` range,
    /// yields `None` instead of being truncated.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            NumberRepr::Int(n) => Some(n),
            NumberRepr::Float(f) => float_to_exact_i64(f),
        }
    }

    /// Returns the value as an `f64`, possibly losing precision.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            NumberRepr::Int(n) => n as f64,
            NumberRepr::Float(f) => f,
        }
    }

    /// Returns `true` if the number is held as an exact integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self.0, NumberRepr::Int(_))
    }
}

fn float_to_exact_i64(f: f64) -> Option<i64> {
    // i64::MIN is exactly -2^63 as f64; the upper bound is exclusive.
    const LOWER: f64 = i64::MIN as f64;
    if f.fract() == 0.0 && f >= LOWER && f < -LOWER {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (NumberRepr::Int(a), NumberRepr::Int(b)) => a == b,
            (NumberRepr::Float(a), NumberRepr::Float(b)) => a == b,
            (NumberRepr::Int(i), NumberRepr::Float(f))
            | (NumberRepr::Float(f), NumberRepr::Int(i)) => float_to_exact_i64(f) == Some(i),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.0, other.0) {
            (NumberRepr::Int(a), NumberRepr::Int(b)) => Some(a.cmp(&b)),
            (NumberRepr::Float(a), NumberRepr::Float(b)) => a.partial_cmp(&b),
            (NumberRepr::Int(i), NumberRepr::Float(f)) => cmp_int_float(i, f),
            (NumberRepr::Float(f), NumberRepr::Int(i)) => {
                cmp_int_float(i, f).map(Ordering::reverse)
            }
        }
    }
}

// Rounding `i` to f64 is monotonic, so a strict result is exact. A tie
// means `f` is integral and is resolved on the integers.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    match (i as f64).partial_cmp(&f)? {
        Ordering::Equal => match float_to_exact_i64(f) {
            Some(t) => Some(i.cmp(&t)),
            // f is 2^63, above every i64.
            None => Some(Ordering::Less),
        },
        ord => Some(ord),
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            NumberRepr::Int(n) => write!(f, "{n}"),
            NumberRepr::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::from_i64(i64::from(value))
    }
}

/// A typed document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Text value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
}

impl Field {
    /// Returns the type tag of this field.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Number(_) => FieldType::Number,
            Self::Bool(_) => FieldType::Bool,
        }
    }

    /// Get this field as text, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this field as a number, if it is one.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this field as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short description used in mismatch errors, e.g. `number 2.5`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String(s) => format!("string {s:?}"),
            Self::Number(n) => format!("number {n}"),
            Self::Bool(b) => format!("bool {b}"),
        }
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Number> for Field {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Number(Number::from_i64(value))
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A document: a set of uniquely named, typed fields.
///
/// Fields are kept ordered by name so that listings and snapshots are
/// deterministic; the order carries no meaning.
///
/// # Example
///
/// ```
/// use docstore_core::{Document, Field};
///
/// let doc = Document::new()
///     .with_field("id", "user:1")
///     .with_field("name", "Alice")
///     .with_field("age", 30);
///
/// assert_eq!(doc.get_str("name"), Some("Alice"));
/// assert_eq!(doc.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Field>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, consuming and returning the document.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Inserts a field, returning the previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Field>) -> Option<Field> {
        self.fields.insert(name.into(), value.into())
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns the named field as text, if present and a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Field::as_str)
    }

    /// Returns `true` if the document has a field with this name.
    #[must_use]
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, field)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Field> {
        self.fields.iter()
    }

    /// Iterates over the field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Field)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Field)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Field);
    type IntoIter = btree_map::IntoIter<String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Field);
    type IntoIter = btree_map::Iter<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
