use std::{ops::Deref, sync::Arc};

use crate::{
    book::Book,
    error::{ErrorVerbosity, ErrorVerbosityProvider},
    schema::PayloadSchema,
    store::BookStore,
    traits::{PayloadSchemaProvider, StateProvider},
};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(
        error_verbosity: ErrorVerbosity,
        book_store: Arc<dyn BookStore>,
        book_schema: PayloadSchema,
    ) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                book_store,
                book_schema,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    book_store: Arc<dyn BookStore>,
    book_schema: PayloadSchema,
}

impl ErrorVerbosityProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }
}

impl StateProvider for ApiState {
    fn book_store(&self) -> &dyn BookStore {
        self.book_store.as_ref()
    }
}

impl PayloadSchemaProvider<Book> for ApiState {
    fn payload_schema(&self) -> &PayloadSchema {
        &self.book_schema
    }
}
