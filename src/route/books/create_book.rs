use axum::extract::State;

use crate::{
    book::Book, error::ApiError, extractor::schema_validated::SchemaValidatedJson,
    state::ApiState, traits::StateProvider,
};

use super::{store_error, BookResponse};

/// Create a book. The payload is checked against the book schema before anything is stored.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 200, description = "The created book", body = BookResponse),
        (status = 400, description = "The payload violates the book schema"),
        (status = 409, description = "A book with this isbn already exists"),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    SchemaValidatedJson(book): SchemaValidatedJson<Book>,
) -> Result<BookResponse, ApiError> {
    let book = state
        .book_store()
        .create(&book)
        .await
        .map_err(store_error(&state))?;

    tracing::info!(isbn = %book.isbn, "Book created");

    Ok(BookResponse { book })
}
