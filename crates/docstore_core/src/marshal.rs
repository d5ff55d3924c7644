//! Mapping between typed records and documents.
//!
//! Domain types opt in by implementing [`Record`] and listing their
//! fields in a descriptor table. Each [`FieldDescriptor`] names the
//! record field, optionally overrides the document field name, and
//! carries an accessor/mutator pair for one supported kind:
//!
//! | Record kind | Document field |
//! |-------------|----------------|
//! | text (`String`) | [`Field::String`] |
//! | integer (`i64`) | [`Field::Number`] |
//! | boolean (`bool`) | [`Field::Bool`] |
//!
//! Fields of any other kind can be declared with
//! [`FieldDescriptor::unsupported`]; marshaling such a record fails with
//! [`CoreError::UnsupportedDocumentField`] naming the kind.
//!
//! # Example
//!
//! ```rust
//! use docstore_core::{marshal_document, from_document, FieldDescriptor, Record};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn descriptors() -> Vec<FieldDescriptor<Self>> {
//!         vec![
//!             FieldDescriptor::text("ID", |u: &User| u.id.clone(), |u: &mut User, v| u.id = v)
//!                 .document_name("id"),
//!             FieldDescriptor::text(
//!                 "Name",
//!                 |u: &User| u.name.clone(),
//!                 |u: &mut User, v| u.name = v,
//!             )
//!             .document_name("name"),
//!         ]
//!     }
//! }
//!
//! let user = User { id: "1".into(), name: "Alice".into() };
//! let doc = marshal_document(&user)?;
//! assert_eq!(doc.get_str("id"), Some("1"));
//!
//! let back: User = from_document(&doc)?;
//! assert_eq!(back, user);
//! # Ok::<(), docstore_core::CoreError>(())
//! ```

use crate::document::{Document, Field, Number};
use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Accessor/mutator pair for one record field.
pub enum FieldAccessor<R> {
    /// Text field.
    Text {
        /// Reads the value.
        get: fn(&R) -> String,
        /// Writes the value.
        set: fn(&mut R, String),
    },
    /// Signed 64-bit integer field.
    Integer {
        /// Reads the value.
        get: fn(&R) -> i64,
        /// Writes the value.
        set: fn(&mut R, i64),
    },
    /// Boolean field.
    Bool {
        /// Reads the value.
        get: fn(&R) -> bool,
        /// Writes the value.
        set: fn(&mut R, bool),
    },
    /// A field whose kind cannot be stored in a document.
    Unsupported {
        /// Name of the kind, e.g. `sequence` or `struct`.
        kind: &'static str,
    },
}

impl<R> FieldAccessor<R> {
    /// Returns the name of the record kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Integer { .. } => "integer",
            Self::Bool { .. } => "bool",
            Self::Unsupported { kind } => *kind,
        }
    }
}

/// Describes how one record field maps onto a document field.
pub struct FieldDescriptor<R> {
    name: &'static str,
    document_name: Option<&'static str>,
    accessor: FieldAccessor<R>,
}

impl<R> FieldDescriptor<R> {
    /// Describes a text field.
    pub fn text(name: &'static str, get: fn(&R) -> String, set: fn(&mut R, String)) -> Self {
        Self::new(name, FieldAccessor::Text { get, set })
    }

    /// Describes an integer field.
    pub fn integer(name: &'static str, get: fn(&R) -> i64, set: fn(&mut R, i64)) -> Self {
        Self::new(name, FieldAccessor::Integer { get, set })
    }

    /// Describes a boolean field.
    pub fn boolean(name: &'static str, get: fn(&R) -> bool, set: fn(&mut R, bool)) -> Self {
        Self::new(name, FieldAccessor::Bool { get, set })
    }

    /// Describes a field of a kind documents cannot hold.
    pub fn unsupported(name: &'static str, kind: &'static str) -> Self {
        Self::new(name, FieldAccessor::Unsupported { kind })
    }

    fn new(name: &'static str, accessor: FieldAccessor<R>) -> Self {
        Self {
            name,
            document_name: None,
            accessor,
        }
    }

    /// Sets the external name used for the document field.
    #[must_use]
    pub fn document_name(mut self, name: &'static str) -> Self {
        self.document_name = Some(name);
        self
    }

    /// Returns the record field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the document field name: the external name if one was
    /// declared, otherwise the record field name.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.document_name.unwrap_or(self.name)
    }

    /// Returns the accessor.
    #[must_use]
    pub fn accessor(&self) -> &FieldAccessor<R> {
        &self.accessor
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("document_name", &self.document_name)
            .field("kind", &self.accessor.kind())
            .finish()
    }
}

/// A typed record that can be converted to and from a [`Document`].
///
/// The descriptor order is the order in which fields are visited.
pub trait Record: Default {
    /// Returns the field descriptor table for this record type.
    fn descriptors() -> Vec<FieldDescriptor<Self>>;
}

/// Converts a record into a document.
///
/// # Errors
///
/// Returns [`CoreError::UnsupportedDocumentField`] if any descriptor
/// declares an unsupported kind.
pub fn marshal_document<R: Record>(record: &R) -> CoreResult<Document> {
    let mut doc = Document::new();

    for descriptor in R::descriptors() {
        let field = match descriptor.accessor() {
            FieldAccessor::Text { get, .. } => Field::String(get(record)),
            FieldAccessor::Integer { get, .. } => Field::Number(Number::from_i64(get(record))),
            FieldAccessor::Bool { get, .. } => Field::Bool(get(record)),
            FieldAccessor::Unsupported { kind } => {
                return Err(CoreError::unsupported_field(descriptor.name(), *kind));
            }
        };
        doc.insert(descriptor.key(), field);
    }

    Ok(doc)
}

/// Copies the fields of `doc` into `record`.
///
/// Record fields whose document field is absent are left untouched.
///
/// # Errors
///
/// - [`CoreError::FieldTypeMismatch`] if a document field holds a
///   different kind than the record expects, or a number that is not
///   an exact integer where an integer is expected
/// - [`CoreError::UnsupportedDocumentField`] if a present field maps
///   onto an unsupported descriptor
pub fn unmarshal_document<R: Record>(doc: &Document, record: &mut R) -> CoreResult<()> {
    for descriptor in R::descriptors() {
        let key = descriptor.key();
        let Some(field) = doc.get(key) else {
            continue;
        };

        match (descriptor.accessor(), field) {
            (&FieldAccessor::Text { set, .. }, Field::String(value)) => set(record, value.clone()),
            (&FieldAccessor::Integer { set, .. }, Field::Number(number)) => {
                let value = number
                    .as_i64()
                    .ok_or_else(|| CoreError::type_mismatch(key, "integer", field.describe()))?;
                set(record, value);
            }
            (&FieldAccessor::Bool { set, .. }, Field::Bool(value)) => set(record, *value),
            (&FieldAccessor::Unsupported { kind }, _) => {
                return Err(CoreError::unsupported_field(descriptor.name(), kind));
            }
            (accessor, _) => {
                return Err(CoreError::type_mismatch(
                    key,
                    accessor.kind(),
                    field.describe(),
                ));
            }
        }
    }

    Ok(())
}

/// Builds a fresh record from a document.
///
/// Absent fields keep their `Default` value.
///
/// # Errors
///
/// Same as [`unmarshal_document`].
pub fn from_document<R: Record>(doc: &Document) -> CoreResult<R> {
    let mut record = R::default();
    unmarshal_document(doc, &mut record)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Account {
        id: String,
        owner: String,
        balance: i64,
        active: bool,
    }

    impl Record for Account {
        fn descriptors() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::text(
                    "id",
                    |a: &Account| a.id.clone(),
                    |a: &mut Account, v| a.id = v,
                ),
                FieldDescriptor::text(
                    "Owner",
                    |a: &Account| a.owner.clone(),
                    |a: &mut Account, v| a.owner = v,
                ),
                FieldDescriptor::integer(
                    "balance",
                    |a: &Account| a.balance,
                    |a: &mut Account, v| a.balance = v,
                )
                .document_name("bal"),
                FieldDescriptor::boolean(
                    "active",
                    |a: &Account| a.active,
                    |a: &mut Account, v| a.active = v,
                ),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct Tagged {
        id: String,
    }

    impl Record for Tagged {
        fn descriptors() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::text(
                    "id",
                    |t: &Tagged| t.id.clone(),
                    |t: &mut Tagged, v| t.id = v,
                ),
                FieldDescriptor::unsupported("tags", "sequence"),
            ]
        }
    }

    fn account() -> Account {
        Account {
            id: "acc:1".into(),
            owner: "Alice".into(),
            balance: -250,
            active: true,
        }
    }

    #[test]
    fn marshal_uses_document_names() {
        let doc = marshal_document(&account()).unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.get_str("id"), Some("acc:1"));
        assert_eq!(doc.get_str("Owner"), Some("Alice"));
        assert_eq!(doc.get("bal"), Some(&Field::from(-250i64)));
        assert_eq!(doc.get("active"), Some(&Field::Bool(true)));
        assert!(!doc.contains_field("balance"));
    }

    #[test]
    fn marshal_then_unmarshal_reproduces_record() {
        let original = account();
        let doc = marshal_document(&original).unwrap();
        let back: Account = from_document(&doc).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn marshal_unsupported_kind() {
        let result = marshal_document(&Tagged { id: "t".into() });
        assert!(matches!(
            result,
            Err(CoreError::UnsupportedDocumentField { ref field, ref kind })
                if field == "tags" && kind == "sequence"
        ));
    }

    #[test]
    fn unmarshal_skips_absent_fields() {
        let doc = Document::new().with_field("id", "acc:2");
        let record: Account = from_document(&doc).unwrap();

        assert_eq!(record.id, "acc:2");
        assert_eq!(record.owner, "");
        assert_eq!(record.balance, 0);
        assert!(!record.active);
    }

    #[test]
    fn unmarshal_leaves_absent_fields_untouched() {
        let mut record = account();
        let doc = Document::new().with_field("Owner", "Bob");
        unmarshal_document(&doc, &mut record).unwrap();

        assert_eq!(record.owner, "Bob");
        assert_eq!(record.balance, -250);
    }

    #[test]
    fn unmarshal_ignores_unknown_document_fields() {
        let doc = marshal_document(&account())
            .unwrap()
            .with_field("extra", "ignored");
        let back: Account = from_document(&doc).unwrap();
        assert_eq!(back, account());
    }

    #[test]
    fn unmarshal_accepts_integral_float() {
        let doc = Document::new().with_field("bal", Number::from_f64(25.0).unwrap());
        let record: Account = from_document(&doc).unwrap();
        assert_eq!(record.balance, 25);
    }

    #[test]
    fn unmarshal_rejects_fractional_number() {
        let doc = Document::new().with_field("bal", Number::from_f64(2.5).unwrap());
        let result = from_document::<Account>(&doc);
        assert!(matches!(
            result,
            Err(CoreError::FieldTypeMismatch { ref field, ref expected, .. })
                if field == "bal" && expected == "integer"
        ));
    }

    #[test]
    fn unmarshal_rejects_kind_mismatch() {
        let doc = Document::new().with_field("active", "yes");
        let result = from_document::<Account>(&doc);
        assert!(matches!(
            result,
            Err(CoreError::FieldTypeMismatch { ref expected, ref found, .. })
                if expected == "bool" && found == "string \"yes\""
        ));

        let doc = Document::new().with_field("id", 7);
        assert!(matches!(
            from_document::<Account>(&doc),
            Err(CoreError::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn unmarshal_into_unsupported_field() {
        let doc = Document::new()
            .with_field("id", "t")
            .with_field("tags", "a,b");
        let result = from_document::<Tagged>(&doc);
        assert!(matches!(
            result,
            Err(CoreError::UnsupportedDocumentField { .. })
        ));
    }

    #[test]
    fn descriptor_key_falls_back_to_name() {
        let descriptors = Account::descriptors();
        let keys: Vec<&str> = descriptors.iter().map(FieldDescriptor::key).collect();
        assert_eq!(keys, vec!["id", "Owner", "bal", "active"]);
        assert_eq!(descriptors[2].name(), "balance");
        assert_eq!(descriptors[2].accessor().kind(), "integer");
    }
}
