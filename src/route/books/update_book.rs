use axum::extract::State;

use crate::{
    book::Book,
    error::{ApiError, ErrorVerbosityProvider, ValidationError},
    extractor::{path::ApiPath, schema_validated::SchemaValidatedJson},
    state::ApiState,
    traits::StateProvider,
};

use super::{store_error, BookResponse};

/// Replace a book. The isbn of a book never changes, so the payload must carry the isbn of the path.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    request_body = Book,
    responses(
        (status = 200, description = "The updated book", body = BookResponse),
        (status = 400, description = "The payload violates the book schema"),
        (status = 404, description = "No book with this isbn"),
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
    SchemaValidatedJson(book): SchemaValidatedJson<Book>,
) -> Result<BookResponse, ApiError> {
    if book.isbn != isbn {
        tracing::warn!(%isbn, payload_isbn = %book.isbn, "Attempt to change isbn");

        return Err(ValidationError::from_messages(
            state.error_verbosity(),
            vec![format!(
                "/isbn: \"{}\" does not match the isbn \"{isbn}\" of the book being updated",
                book.isbn
            )],
        )
        .into());
    }

    let book = state
        .book_store()
        .update(&isbn, &book)
        .await
        .map_err(store_error(&state))?;

    tracing::info!(%isbn, "Book updated");

    Ok(BookResponse { book })
}
