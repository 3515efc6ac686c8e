use std::str::FromStr;

use axum::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use super::{BookStore, StoreError};
use crate::book::{Book, BookFilter};

/// [`BookStore`] backed by the `books` table of a SQLite database.
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Connects to `database_url`, creating the database file if needed, and runs pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database. The pool is pinned to a single connection that never expires,
    /// otherwise every new connection would see an empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!().run(&pool).await?;

        tracing::debug!("Migrations applied");

        Ok(Self { pool })
    }
}

/// Case folding applied to searchable columns and filter values alike.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so folding happens here.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Turns a filter value into a `LIKE` pattern matching its folded form as a literal substring.
fn contains_pattern(value: &str) -> String {
    let escaped = fold(value)
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

#[async_trait]
impl BookStore for SqliteBookStore {
    #[tracing::instrument(skip(self))]
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            WHERE (?1 IS NULL OR author_folded LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR title_folded LIKE ?2 ESCAPE '\')
              AND (?3 IS NULL OR publisher_folded LIKE ?3 ESCAPE '\')
              AND (?4 IS NULL OR language_folded LIKE ?4 ESCAPE '\')
            ORDER BY title, isbn
            "#,
        )
        .bind(filter.author.as_deref().map(contains_pattern))
        .bind(filter.title.as_deref().map(contains_pattern))
        .bind(filter.publisher.as_deref().map(contains_pattern))
        .bind(filter.language.as_deref().map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        tracing::trace!(count = books.len(), "Found books");

        Ok(books)
    }

    #[tracing::instrument(skip(self))]
    async fn find_one(&self, isbn: &str) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            WHERE isbn = ?
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    #[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                isbn, amazon_url, author, language, pages, publisher, title, year,
                author_folded, language_folded, publisher_folded, title_folded
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(fold(&book.author))
        .bind(fold(&book.language))
        .bind(fold(&book.publisher))
        .bind(fold(&book.title))
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::AlreadyExists {
                    isbn: book.isbn.clone(),
                }
            }
            err => StoreError::Database(err),
        })
    }

    #[tracing::instrument(skip(self, book))]
    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ?,
                author_folded = ?, language_folded = ?, publisher_folded = ?, title_folded = ?
            WHERE isbn = ?
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(fold(&book.author))
        .bind(fold(&book.language))
        .bind(fold(&book.publisher))
        .bind(fold(&book.title))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound {
                isbn: isbn.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str, author: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: None,
            author: author.to_string(),
            language: "english".to_string(),
            pages: 100,
            publisher: "Publisher".to_string(),
            title: title.to_string(),
            year: 2000,
        }
    }

    #[tokio::test]
    async fn find_all_filters_by_substring_ignoring_case() {
        let store = SqliteBookStore::in_memory().await.unwrap();
        store.create(&book("1", "Power-Up", "Matthew Lane")).await.unwrap();
        store.create(&book("2", "Dune", "Frank Herbert")).await.unwrap();

        let filter = BookFilter {
            author: Some("lane".to_string()),
            ..Default::default()
        };
        let found = store.find_all(&filter).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].isbn, "1");
    }

    #[tokio::test]
    async fn find_all_folds_non_ascii_case() {
        let store = SqliteBookStore::in_memory().await.unwrap();
        store.create(&book("1", "Germinal", "Émile Zola")).await.unwrap();
        store.create(&book("2", "Dune", "Frank Herbert")).await.unwrap();

        for author in ["émile", "ÉMILE", "Émile"] {
            let filter = BookFilter {
                author: Some(author.to_string()),
                ..Default::default()
            };
            let found = store.find_all(&filter).await.unwrap();

            assert_eq!(found.len(), 1, "{author}");
            assert_eq!(found[0].author, "Émile Zola");
        }
    }

    #[tokio::test]
    async fn update_refreshes_searchable_columns() {
        let store = SqliteBookStore::in_memory().await.unwrap();
        store.create(&book("1", "Germinal", "Émile Zola")).await.unwrap();
        store.update("1", &book("1", "Nana", "ÉMILE ZOLA")).await.unwrap();

        let by_title = |title: &str| BookFilter {
            title: Some(title.to_string()),
            ..Default::default()
        };

        assert!(store.find_all(&by_title("germinal")).await.unwrap().is_empty());
        assert_eq!(store.find_all(&by_title("NANA")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_all_treats_like_wildcards_literally() {
        let store = SqliteBookStore::in_memory().await.unwrap();
        store.create(&book("1", "100% Rust", "A")).await.unwrap();
        store.create(&book("2", "1000 Rust", "B")).await.unwrap();

        let filter = BookFilter {
            title: Some("0%".to_string()),
            ..Default::default()
        };
        let found = store.find_all(&filter).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].isbn, "1");
    }

    #[tokio::test]
    async fn create_duplicate_isbn_is_rejected() {
        let store = SqliteBookStore::in_memory().await.unwrap();
        store.create(&book("1", "Dune", "Frank Herbert")).await.unwrap();

        let err = store
            .create(&book("1", "Dune Messiah", "Frank Herbert"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists { isbn } if isbn == "1"));
    }

    #[tokio::test]
    async fn update_and_remove_missing_book_is_not_found() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        let err = store.update("404", &book("404", "T", "A")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store.remove("404").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
