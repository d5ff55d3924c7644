//! User service backing the `demo` command.
//!
//! A minimal domain layer over one collection: typed users go in and come
//! out, documents stay an implementation detail.

use docstore_core::{
    from_document, marshal_document, Collection, CoreError, FieldDescriptor, Record,
};
use thiserror::Error;

/// Errors returned by [`UserService`].
#[derive(Debug, Error)]
pub enum UserError {
    /// No user with the requested id.
    #[error("user not found: {id}")]
    NotFound {
        /// The missing id.
        id: String,
    },

    /// Error from the underlying collection or marshaler.
    #[error(transparent)]
    Store(#[from] CoreError),
}

/// Result type for user operations.
pub type UserResult<T> = Result<T, UserError>;

/// A user record, stored as `{"id": ..., "name": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Unique id, the collection's primary key.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl User {
    /// Creates a user.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Record for User {
    fn descriptors() -> Vec<FieldDescriptor<Self>> {
        vec![
            FieldDescriptor::text("ID", |u: &User| u.id.clone(), |u: &mut User, v| u.id = v)
                .document_name("id"),
            FieldDescriptor::text(
                "Name",
                |u: &User| u.name.clone(),
                |u: &mut User, v| u.name = v,
            )
            .document_name("name"),
        ]
    }
}

/// User operations over a collection keyed by `id`.
pub struct UserService<'a> {
    collection: &'a mut Collection,
}

impl<'a> UserService<'a> {
    /// Wraps a collection whose primary key is `id`.
    pub fn new(collection: &'a mut Collection) -> Self {
        Self { collection }
    }

    /// Stores a new user, replacing any user with the same id.
    pub fn create_user(&mut self, id: &str, name: &str) -> UserResult<User> {
        let user = User::new(id, name);
        self.collection.put(marshal_document(&user)?)?;
        Ok(user)
    }

    /// Returns all users. An empty collection yields an empty vector.
    pub fn list_users(&self) -> UserResult<Vec<User>> {
        self.collection
            .list()
            .iter()
            .map(|doc| from_document(doc).map_err(UserError::from))
            .collect()
    }

    /// Returns the user with the given id.
    pub fn get_user(&self, id: &str) -> UserResult<User> {
        let doc = self.collection.get(id).map_err(|err| not_found(id, err))?;
        Ok(from_document(&doc)?)
    }

    /// Deletes the user with the given id.
    pub fn delete_user(&mut self, id: &str) -> UserResult<()> {
        self.collection.delete(id).map_err(|err| not_found(id, err))
    }
}

fn not_found(id: &str, err: CoreError) -> UserError {
    match err {
        CoreError::DocumentNotFound { .. } => UserError::NotFound { id: id.to_string() },
        other => UserError::Store(other),
    }
}
