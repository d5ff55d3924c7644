//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use crate::fixtures::Member;
use docstore_core::{Document, Field, Number};
use proptest::prelude::*;

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-zA-Z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating short free-form text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(".{0,24}").expect("Invalid regex")
}

/// Strategy for generating non-empty primary key values.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9:_-]{1,16}").expect("Invalid regex")
}

/// Strategy for generating numbers, both integral and fractional.
pub fn number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i64>().prop_map(Number::from_i64),
        (-1.0e12f64..1.0e12f64).prop_filter_map("must be finite", Number::from_f64),
    ]
}

/// Strategy for generating a field of any supported type.
pub fn field_strategy() -> impl Strategy<Value = Field> {
    prop_oneof![
        text_strategy().prop_map(Field::String),
        number_strategy().prop_map(Field::Number),
        any::<bool>().prop_map(Field::Bool),
    ]
}

/// Strategy for generating a valid document for a collection keyed by `primary_key`.
///
/// The primary key field always holds a non-empty string; the remaining
/// fields are arbitrary.
pub fn document_strategy(primary_key: &'static str) -> impl Strategy<Value = Document> {
    (
        key_strategy(),
        prop::collection::btree_map(field_name_strategy(), field_strategy(), 0..8),
    )
        .prop_map(move |(key, fields)| {
            let mut doc: Document = fields.into_iter().collect();
            doc.insert(primary_key, key);
            doc
        })
}

/// Strategy for generating [`Member`] records over the full `i64` range.
pub fn record_strategy() -> impl Strategy<Value = Member> {
    (key_strategy(), text_strategy(), any::<i64>(), any::<bool>()).prop_map(
        |(id, name, age, admin)| Member {
            id,
            name,
            age,
            admin,
        },
    )
}

/// An operation against a single collection.
#[derive(Debug, Clone)]
pub enum CollectionOperation {
    /// Put a document.
    Put {
        /// Document to store.
        doc: Document,
    },
    /// Delete by key.
    Delete {
        /// Key to delete.
        key: String,
    },
}

/// Strategy for generating a sequence of collection operations over `primary_key`.
///
/// Keys are drawn from a small pool so puts and deletes collide.
pub fn operations_strategy(
    primary_key: &'static str,
    max_ops: usize,
) -> impl Strategy<Value = Vec<CollectionOperation>> {
    let key = prop::sample::select(vec!["a", "b", "c", "d", "e"]);
    let op = prop_oneof![
        3 => (key.clone(), field_strategy()).prop_map(move |(k, value)| {
            CollectionOperation::Put {
                doc: Document::new()
                    .with_field(primary_key, k)
                    .with_field("value", value),
            }
        }),
        1 => key.prop_map(|k| CollectionOperation::Delete { key: k.to_string() }),
    ];
    prop::collection::vec(op, 0..max_ops)
}
