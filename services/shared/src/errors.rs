/// Shared error types for the AUREX wallet services
///
/// Design Philosophy:
/// - Standardized error codes the browser UI can switch on
/// - Categorized by error domain (Validation, Network, Upstream, Unauthorized, Internal)
/// - The message is safe to show to the player as a toast
/// - Context carries debugging detail that is logged but not meant for display
///
/// Usage:
/// - Domain errors convert into ServiceError via `From`
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Validation errors (400 Bad Request)
    /// Player input failed a client-side check
    Validation,

    /// Network errors (502 Bad Gateway)
    /// Upstream API unreachable or timing out
    Network,

    /// Upstream errors (502 Bad Gateway)
    /// Upstream API answered but refused or returned garbage
    Upstream,

    /// Missing or rejected session (401 Unauthorized)
    Unauthorized,

    /// Internal service errors (500 Internal Server Error)
    Internal,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Network => 502,
            ErrorCategory::Upstream => 502,
            ErrorCategory::Unauthorized => 401,
            ErrorCategory::Internal => 500,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "info",
            ErrorCategory::Network => "error",
            ErrorCategory::Upstream => "warn",
            ErrorCategory::Unauthorized => "warn",
            ErrorCategory::Internal => "error",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "Validation",
            ErrorCategory::Network => "Network",
            ErrorCategory::Upstream => "Upstream",
            ErrorCategory::Unauthorized => "Unauthorized",
            ErrorCategory::Internal => "Internal",
        }
    }
}

/// Standard error codes used across all services
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_INPUT: ErrorCode = ErrorCode("VALIDATION_INVALID_INPUT");
    pub const VALIDATION_MISSING_FIELD: ErrorCode = ErrorCode("VALIDATION_MISSING_FIELD");
    pub const VALIDATION_INVALID_AMOUNT: ErrorCode = ErrorCode("VALIDATION_INVALID_AMOUNT");
    pub const VALIDATION_MISSING_PAYMENT_METHOD: ErrorCode =
        ErrorCode("VALIDATION_MISSING_PAYMENT_METHOD");
    pub const VALIDATION_UNKNOWN_PAYMENT_METHOD: ErrorCode =
        ErrorCode("VALIDATION_UNKNOWN_PAYMENT_METHOD");
    pub const VALIDATION_BELOW_METHOD_MINIMUM: ErrorCode =
        ErrorCode("VALIDATION_BELOW_METHOD_MINIMUM");
    pub const VALIDATION_ABOVE_METHOD_MAXIMUM: ErrorCode =
        ErrorCode("VALIDATION_ABOVE_METHOD_MAXIMUM");
    pub const VALIDATION_BELOW_BONUS_MINIMUM: ErrorCode =
        ErrorCode("VALIDATION_BELOW_BONUS_MINIMUM");

    // Network errors
    pub const NETWORK_UPSTREAM_UNAVAILABLE: ErrorCode = ErrorCode("NETWORK_UPSTREAM_UNAVAILABLE");
    pub const NETWORK_UPSTREAM_TIMEOUT: ErrorCode = ErrorCode("NETWORK_UPSTREAM_TIMEOUT");

    // Upstream errors
    pub const UPSTREAM_REJECTED: ErrorCode = ErrorCode("UPSTREAM_REJECTED");
    pub const UPSTREAM_BAD_STATUS: ErrorCode = ErrorCode("UPSTREAM_BAD_STATUS");
    pub const UPSTREAM_INVALID_RESPONSE: ErrorCode = ErrorCode("UPSTREAM_INVALID_RESPONSE");

    // Session errors
    pub const UNAUTHORIZED_NO_SESSION: ErrorCode = ErrorCode("UNAUTHORIZED_NO_SESSION");
    pub const UNAUTHORIZED_TOKEN_REJECTED: ErrorCode = ErrorCode("UNAUTHORIZED_TOKEN_REJECTED");

    // Internal errors
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure returned to the browser
///
/// Serialized as the `error` member of every failed response:
/// `{ "error": { "category", "code", "message", "context"? } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Player-facing message
    pub message: String,

    /// Optional additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    /// Create a new ServiceError
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_INPUT,
            message,
        )
    }

    pub fn missing_field(field: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_MISSING_FIELD,
            format!("Missing required field: {}", field),
        )
    }

    // Upstream constructors. Messages stay generic: the toast reads
    // "server error" whatever went wrong behind the API.
    pub fn upstream_unavailable(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_UPSTREAM_UNAVAILABLE,
            "Server error, please try again later",
        )
        .with_context(detail.to_string())
    }

    pub fn upstream_timeout(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_UPSTREAM_TIMEOUT,
            "Server error, please try again later",
        )
        .with_context(detail.to_string())
    }

    pub fn upstream_rejected(message: Option<String>) -> Self {
        Self::new(
            ErrorCategory::Upstream,
            ErrorCode::UPSTREAM_REJECTED,
            message.unwrap_or_else(|| "Server error".to_string()),
        )
    }

    pub fn upstream_bad_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Upstream,
            ErrorCode::UPSTREAM_BAD_STATUS,
            "Server error",
        )
        .with_context(format!("status: {}, body: {}", status, body.into()))
    }

    pub fn upstream_invalid_response(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Upstream,
            ErrorCode::UPSTREAM_INVALID_RESPONSE,
            "Server error",
        )
        .with_context(detail.to_string())
    }

    pub fn no_session() -> Self {
        Self::new(
            ErrorCategory::Unauthorized,
            ErrorCode::UNAUTHORIZED_NO_SESSION,
            "Please log in to continue",
        )
    }

    pub fn token_rejected() -> Self {
        Self::new(
            ErrorCategory::Unauthorized,
            ErrorCode::UNAUTHORIZED_TOKEN_REJECTED,
            "Your session has expired, please log in again",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_UNEXPECTED,
            message,
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

// Convenience type alias
pub type Result<T> = std::result::Result<T, ServiceError>;
