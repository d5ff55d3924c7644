//! Error types for DocStore core.

use docstore_storage::StorageError;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in DocStore core operations.
///
/// Validation errors (`NilValue` through `FieldTypeMismatch`) are kept
/// apart from the I/O and codec classes so callers can tell a rejected
/// write from a failing disk.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required input was absent (empty document, missing config).
    #[error("nil value: {what}")]
    NilValue {
        /// What was missing.
        what: String,
    },

    /// The primary key field is missing, not a string, or empty.
    #[error("invalid primary key '{primary_key}': {reason}")]
    InvalidPrimaryKey {
        /// Name of the configured primary key field.
        primary_key: String,
        /// Why the key was rejected.
        reason: String,
    },

    /// No document is stored under the given key.
    #[error("document not found: {key}")]
    DocumentNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A collection with this name already exists.
    #[error("collection already exists: {name}")]
    CollectionAlreadyExists {
        /// Name of the collection.
        name: String,
    },

    /// Collection not found.
    #[error("collection not found: {name}")]
    CollectionNotFound {
        /// Name of the collection.
        name: String,
    },

    /// A record field has a kind that cannot be stored in a document.
    #[error("unsupported document field '{field}': {kind}")]
    UnsupportedDocumentField {
        /// Name of the record field.
        field: String,
        /// The offending kind.
        kind: String,
    },

    /// A document field does not match the kind the record expects.
    #[error("field type mismatch on '{field}': expected {expected}, found {found}")]
    FieldTypeMismatch {
        /// Name of the document field.
        field: String,
        /// Kind the record field expects.
        expected: String,
        /// What the document actually holds.
        found: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage backend error other than I/O.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Snapshot could not be decoded.
    #[error("snapshot decode error: {message}")]
    Decode {
        /// Description of the decoding error.
        message: String,
    },

    /// Snapshot could not be encoded.
    #[error("snapshot encode error: {message}")]
    Encode {
        /// Description of the encoding error.
        message: String,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(io) => Self::Io(io),
            other => Self::Storage(other),
        }
    }
}

impl CoreError {
    /// Creates a nil value error.
    pub fn nil_value(what: impl Into<String>) -> Self {
        Self::NilValue { what: what.into() }
    }

    /// Creates an invalid primary key error.
    pub fn invalid_primary_key(primary_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrimaryKey {
            primary_key: primary_key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a document not found error.
    pub fn document_not_found(key: impl Into<String>) -> Self {
        Self::DocumentNotFound { key: key.into() }
    }

    /// Creates a collection already exists error.
    pub fn collection_already_exists(name: impl Into<String>) -> Self {
        Self::CollectionAlreadyExists { name: name.into() }
    }

    /// Creates a collection not found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound { name: name.into() }
    }

    /// Creates an unsupported document field error.
    pub fn unsupported_field(field: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedDocumentField {
            field: field.into(),
            kind: kind.into(),
        }
    }

    /// Creates a field type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::FieldTypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised by write or lookup validation,
    /// as opposed to I/O and codec failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::Storage(_) | Self::Decode { .. } | Self::Encode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_io_is_unwrapped() {
        let storage = StorageError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err: CoreError = storage.into();
        assert!(matches!(err, CoreError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(!err.is_validation());
    }

    #[test]
    fn storage_path_error_stays_storage() {
        let storage = StorageError::InvalidPath { path: "/".into() };
        let err: CoreError = storage.into();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            CoreError::document_not_found("user:1").to_string(),
            "document not found: user:1"
        );
        assert_eq!(
            CoreError::invalid_primary_key("id", "field is missing").to_string(),
            "invalid primary key 'id': field is missing"
        );
        assert_eq!(
            CoreError::unsupported_field("tags", "sequence").to_string(),
            "unsupported document field 'tags': sequence"
        );
    }

    #[test]
    fn validation_classification() {
        assert!(CoreError::nil_value("document fields").is_validation());
        assert!(CoreError::collection_not_found("users").is_validation());
        assert!(!CoreError::decode("bad json").is_validation());
    }
}
