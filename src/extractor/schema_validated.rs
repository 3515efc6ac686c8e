use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::{ApiError, BodyError, ErrorVerbosityProvider, InternalServerError, ValidationError},
    schema::integralize,
    traits::PayloadSchemaProvider,
};

use super::json::ApiJson;

/// Extracts a JSON body, checks it against the payload schema the state provides for `T`
/// and only then deserializes it into `T`.
///
/// Every schema violation is reported at once as a [`ValidationError`].
pub struct SchemaValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for SchemaValidatedJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider + PayloadSchemaProvider<T>,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "schema_validated_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(mut payload) = ApiJson::<Value>::from_request(req, state).await?;

        let verbosity = state.error_verbosity();

        if let Err(messages) = state.payload_schema().validate(&payload) {
            tracing::warn!(?messages, "Schema violations");

            return Err(ValidationError::from_messages(verbosity, messages).into());
        }

        integralize(&mut payload);

        match serde_json::from_value::<T>(payload) {
            Ok(extracted) => {
                tracing::trace!(?extracted, "Validated");

                Ok(SchemaValidatedJson(extracted))
            }
            Err(err) => {
                tracing::warn!(%err, "Schema accepted a payload that does not deserialize");

                let body_expected_schema = serde_yaml::to_string(&schema_for!(T))
                    .map_err(|err| InternalServerError::from_generic_error(verbosity, err))?;

                Err(BodyError::new(verbosity, err.to_string(), body_expected_schema).into())
            }
        }
    }
}
