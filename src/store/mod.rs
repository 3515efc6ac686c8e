use axum::async_trait;

use crate::book::{Book, BookFilter};

mod sqlite;

pub use sqlite::SqliteBookStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No book with isbn {isbn}")]
    NotFound { isbn: String },
    #[error("A book with isbn {isbn} already exists")]
    AlreadyExists { isbn: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Durable CRUD on [`Book`] records.
///
/// Implementations own all persisted state and are responsible for consistency between concurrent callers.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Returns all books matching `filter`, possibly none.
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError>;

    async fn find_one(&self, isbn: &str) -> Result<Book, StoreError>;

    /// Persists a new book and returns it as stored.
    async fn create(&self, book: &Book) -> Result<Book, StoreError>;

    /// Overwrites every field of the book identified by `isbn` except the isbn itself.
    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError>;

    async fn remove(&self, isbn: &str) -> Result<(), StoreError>;
}
