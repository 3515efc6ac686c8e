pub mod json;
pub mod path;
pub mod query;
pub mod schema_validated;
pub mod validated;

/// An extractor wrapping a value that other extractors, like [`validated::Validated`], can inspect.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
