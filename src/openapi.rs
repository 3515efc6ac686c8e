use axum::Json;
use utoipa::OpenApi;

use crate::{
    book::Book,
    route::books::{self, BookResponse, BooksResponse, MessageResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        books::list_books::list_books,
        books::get_book::get_book,
        books::create_book::create_book,
        books::update_book::update_book,
        books::delete_book::delete_book,
    ),
    components(schemas(Book, BookResponse, BooksResponse, MessageResponse)),
    tags((name = "books", description = "Book records"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
