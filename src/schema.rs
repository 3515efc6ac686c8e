use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;

/// The book schema shipped with the server, used when no schema file is configured.
pub const DEFAULT_BOOK_SCHEMA: &str = include_str!("../schema/book.schema.json");

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Schema is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Schema could not be compiled: {0}")]
    Compile(String),
}

/// A compiled JSON Schema document that request payloads are checked against.
pub struct PayloadSchema {
    validator: Validator,
}

impl PayloadSchema {
    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|err| SchemaError::Compile(err.to_string()))?;

        Ok(Self { validator })
    }

    pub fn parse(schema: &str) -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(schema).map_err(SchemaError::Parse)?;

        Self::from_value(&schema)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let schema = tokio::fs::read_to_string(path)
            .await
            .map_err(SchemaError::Read)?;

        Self::parse(&schema)
    }

    pub fn default_book_schema() -> Result<Self, SchemaError> {
        Self::parse(DEFAULT_BOOK_SCHEMA)
    }

    /// Validates `instance`, returning every violation as a message.
    ///
    /// Messages about nested values are prefixed with the JSON pointer of the offending value.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let messages = self
            .validator
            .iter_errors(instance)
            .map(|err| {
                let path = err.instance_path.to_string();

                match path.is_empty() {
                    true => err.to_string(),
                    false => format!("{path}: {err}"),
                }
            })
            .collect::<Vec<_>>();

        match messages.is_empty() {
            true => Ok(()),
            false => Err(messages),
        }
    }
}

/// Rewrites numbers with a zero fractional part, like `896.0`, as integers.
///
/// JSON Schema counts them as integers but serde refuses to deserialize them into integer types.
pub fn integralize(value: &mut Value) {
    match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(float) = number.as_f64() {
                if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
                    *number = (float as i64).into();
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integralize),
        Value::Object(fields) => fields.values_mut().for_each(integralize),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn power_up() -> Value {
        json!({
            "isbn": "0691161518",
            "amazonUrl": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up",
            "year": 2017
        })
    }

    #[test]
    fn default_book_schema_accepts_a_complete_book() {
        let schema = PayloadSchema::default_book_schema().unwrap();

        assert!(schema.validate(&power_up()).is_ok());
    }

    #[test]
    fn amazon_url_is_optional() {
        let schema = PayloadSchema::default_book_schema().unwrap();
        let mut book = power_up();
        book.as_object_mut().unwrap().remove("amazonUrl");

        assert!(schema.validate(&book).is_ok());
    }

    #[test]
    fn every_violation_is_reported() {
        let schema = PayloadSchema::default_book_schema().unwrap();
        let mut book = power_up();
        book.as_object_mut().unwrap().remove("title");
        book["pages"] = json!("264");

        let messages = schema.validate(&book).unwrap_err();

        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("title")));
        assert!(messages.iter().any(|m| m.starts_with("/pages")));
    }

    #[test]
    fn pages_must_be_positive() {
        let schema = PayloadSchema::default_book_schema().unwrap();
        let mut book = power_up();
        book["pages"] = json!(0);

        assert!(schema.validate(&book).is_err());
    }

    #[test]
    fn amazon_url_must_be_a_uri() {
        let schema = PayloadSchema::default_book_schema().unwrap();
        let mut book = power_up();
        book["amazonUrl"] = json!("not a url");

        let messages = schema.validate(&book).unwrap_err();

        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("/amazonUrl"));
    }

    #[test]
    fn integers_must_fit_in_32_bits() {
        let schema = PayloadSchema::default_book_schema().unwrap();
        let mut book = power_up();
        book["year"] = json!(3_000_000_000i64);
        book["pages"] = json!(2_147_483_648i64);

        let messages = schema.validate(&book).unwrap_err();

        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.starts_with("/year")));
        assert!(messages.iter().any(|m| m.starts_with("/pages")));
    }

    #[test]
    fn integral_floats_become_integers() {
        let mut value = json!({ "pages": 896.0, "ratio": 0.5, "nested": [2017.0, "2017.0"] });

        integralize(&mut value);

        assert_eq!(value, json!({ "pages": 896, "ratio": 0.5, "nested": [2017, "2017.0"] }));
        assert!(value["pages"].is_i64());
    }

    #[test]
    fn invalid_schema_document_is_rejected() {
        assert!(matches!(
            PayloadSchema::parse("{ not json"),
            Err(SchemaError::Parse(_))
        ));
    }
}
