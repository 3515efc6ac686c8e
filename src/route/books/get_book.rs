use axum::extract::State;

use crate::{
    error::ApiError, extractor::path::ApiPath, state::ApiState, traits::StateProvider,
};

use super::{store_error, BookResponse};

#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "No book with this isbn"),
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<BookResponse, ApiError> {
    let book = state
        .book_store()
        .find_one(&isbn)
        .await
        .map_err(store_error(&state))?;

    Ok(BookResponse { book })
}
