use crate::{error::ErrorVerbosityProvider, schema::PayloadSchema, store::BookStore};

pub trait StateProvider: ErrorVerbosityProvider {
    /// Returns the store books are persisted in.
    fn book_store(&self) -> &dyn BookStore;
}

/// Provides the schema a JSON payload of type `T` must satisfy before it is deserialized.
pub trait PayloadSchemaProvider<T> {
    fn payload_schema(&self) -> &PayloadSchema;
}
