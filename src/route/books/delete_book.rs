use axum::extract::State;

use crate::{
    error::ApiError, extractor::path::ApiPath, state::ApiState, traits::StateProvider,
};

use super::{store_error, MessageResponse};

#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "The book was deleted", body = MessageResponse),
        (status = 404, description = "No book with this isbn"),
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<MessageResponse, ApiError> {
    state
        .book_store()
        .remove(&isbn)
        .await
        .map_err(store_error(&state))?;

    tracing::info!(%isbn, "Book deleted");

    Ok(MessageResponse {
        message: "Book deleted".to_string(),
    })
}
