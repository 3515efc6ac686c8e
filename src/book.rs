use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A single publication record, keyed by its isbn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[schema(example = "0691161518")]
    pub isbn: String,
    #[serde(default)]
    #[schema(example = "http://a.co/eobPtX2")]
    pub amazon_url: Option<String>,
    #[schema(example = "Matthew Lane")]
    pub author: String,
    #[schema(example = "english")]
    pub language: String,
    #[schema(example = 264)]
    pub pages: i32,
    #[schema(example = "Princeton University Press")]
    pub publisher: String,
    #[schema(example = "Power-Up")]
    pub title: String,
    #[schema(example = 2017)]
    pub year: i32,
}

/// Optional list filters. Every given filter is a case-insensitive substring match.
#[derive(Debug, Default, Clone, Deserialize, JsonSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub publisher: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub language: Option<String>,
}
