use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::calculator::DepositRejection;
use shared::errors::ServiceError;

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Deposit rejected: {0}")]
    Rejected(#[from] DepositRejection),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiError),

    #[error("{0}")]
    Service(ServiceError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn no_session() -> Self {
        AppError::Service(ServiceError::no_session())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::Service(ServiceError::invalid_input(message))
    }

    pub fn to_service_error(&self) -> ServiceError {
        match self {
            AppError::Rejected(rejection) => rejection.clone().into(),
            AppError::Upstream(error) => error.clone().into(),
            AppError::Service(error) => error.clone(),
            AppError::Internal(_) => ServiceError::internal("Internal server error"),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        AppError::Service(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = self.to_service_error();

        match error.category.log_level() {
            "error" => {
                tracing::error!(error_code = %error.code, error = %self, context = ?error.context, "Request failed");
            }
            "warn" => {
                tracing::warn!(error_code = %error.code, error = %self, "Request failed");
            }
            _ => {
                tracing::info!(error_code = %error.code, message = %error.message, "Request rejected");
            }
        }

        metrics::counter!(
            "errors_total",
            "category" => error.category.as_str(),
            "code" => error.code.clone()
        )
        .increment(1);

        let status = StatusCode::from_u16(error.category.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": error,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
