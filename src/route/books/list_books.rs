use axum::extract::State;

use crate::{
    book::BookFilter,
    error::ApiError,
    extractor::{query::ApiQuery, validated::Validated},
    state::ApiState,
    traits::StateProvider,
};

use super::{store_error, BooksResponse};

/// List books, optionally filtered by author, title, publisher or language.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "Matching books, possibly none", body = BooksResponse),
        (status = 400, description = "Invalid filters"),
    )
)]
pub async fn list_books(
    State(state): State<ApiState>,
    Validated(ApiQuery(filter)): Validated<ApiQuery<BookFilter>>,
) -> Result<BooksResponse, ApiError> {
    let books = state
        .book_store()
        .find_all(&filter)
        .await
        .map_err(store_error(&state))?;

    Ok(BooksResponse { books })
}
