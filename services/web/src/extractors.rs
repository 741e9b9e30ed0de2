use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use shared::constants::SESSION_HEADER;
use shared::errors::ServiceError;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

/// JSON extractor that runs `validator` rules and formats failures
///
/// Deserialization errors and rule violations both come back as the
/// standard `{ "error": { ... } }` body instead of axum's plain text.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Service(describe_rejection(&rejection)))?;

        value.validate().map_err(|errors| {
            AppError::Service(
                ServiceError::invalid_input(first_validation_message(&errors))
                    .with_context(errors.to_string()),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

fn describe_rejection(rejection: &JsonRejection) -> ServiceError {
    let error_message = rejection.body_text();

    let error = if let Some(field) = error_message
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        ServiceError::missing_field(field)
    } else if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        ServiceError::invalid_input("Expected a JSON request body")
    } else {
        ServiceError::invalid_input("Invalid request body")
    };

    tracing::warn!(
        error_code = %error.code,
        original_error = %error_message,
        "Request validation failed during JSON deserialization"
    );

    error.with_context(error_message)
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request body".to_string())
}

/// The caller's session, resolved from the `x-session-id` header
///
/// Wrap in `Option` for endpoints that also serve anonymous visitors.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(AppError::no_session)?;

        let session = state.sessions.resolve(id).await.ok_or_else(AppError::no_session)?;
        Ok(CurrentSession(session))
    }
}
