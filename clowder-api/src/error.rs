//! API error taxonomy
//!
//! One error type crosses every layer: the database client, the services,
//! and the route handlers all return `ApiResult`. Each `ErrorCode` carries
//! its transport status, so only this module knows how a domain failure
//! turns into an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODES
// ============================================================================

/// Machine-readable failure categories, serialized into the response body
/// alongside the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ------------------------------------------------------------------
    // 404 - missing rows
    // ------------------------------------------------------------------
    /// Generic missing entity
    EntityNotFound,

    /// No cat with the requested id
    CatNotFound,

    /// No mission with the requested id
    MissionNotFound,

    /// No such target under the requested mission
    TargetNotFound,

    // ------------------------------------------------------------------
    // 422 - the request itself is wrong
    // ------------------------------------------------------------------
    /// Payload failed shape validation
    ValidationFailed,

    /// Semantically invalid value, e.g. a breed the catalog does not know
    InvalidInput,

    /// A required field is absent or blank
    MissingField,

    /// A numeric or length bound was violated
    InvalidRange,

    // ------------------------------------------------------------------
    // 409 - the request is fine, the current state forbids it
    // ------------------------------------------------------------------
    /// State-invariant violation (already assigned, already completed, ...)
    StateConflict,

    // ------------------------------------------------------------------
    // 5xx
    // ------------------------------------------------------------------
    /// The breed catalog (or another dependency) could not be reached
    ServiceUnavailable,

    /// No free connection in the pool within the deadline
    ConnectionPoolExhausted,

    /// A query failed for reasons the client cannot fix
    DatabaseError,

    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// The transport status this code maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::EntityNotFound
            | ErrorCode::CatNotFound
            | ErrorCode::MissionNotFound
            | ErrorCode::TargetNotFound => StatusCode::NOT_FOUND,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidRange => StatusCode::UNPROCESSABLE_ENTITY,

            ErrorCode::StateConflict => StatusCode::CONFLICT,

            ErrorCode::ServiceUnavailable
            | ErrorCode::ConnectionPoolExhausted => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::DatabaseError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fallback message used when the caller does not supply one.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::CatNotFound => "Cat not found",
            ErrorCode::MissionNotFound => "Mission not found",
            ErrorCode::TargetNotFound => "Target not found",

            ErrorCode::ValidationFailed => "Request failed validation",
            ErrorCode::InvalidInput => "Input is not valid",
            ErrorCode::MissingField => "A required field is missing",
            ErrorCode::InvalidRange => "Value is outside the allowed range",

            ErrorCode::StateConflict => "Operation conflicts with the current state",

            ErrorCode::ServiceUnavailable => "A required external service is unavailable",
            ErrorCode::ConnectionPoolExhausted => "Database connection pool exhausted",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR
// ============================================================================

/// The error half of every fallible operation in this crate.
///
/// Handlers return it directly; axum turns it into a JSON body of the form
/// `{code, message, details?}` with the status taken from the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    pub code: ErrorCode,

    pub message: String,

    /// Extra structured context, e.g. per-field validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Build an error carrying only the code's default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ------------------------------------------------------------------
    // Constructors, one per failure the handlers actually report
    // ------------------------------------------------------------------

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn invalid_range(field: &str, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' must be between {} and {}", field, min, max),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntityNotFound, message)
    }

    pub fn cat_not_found(cat_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::CatNotFound,
            format!("Cat with id {} not found", cat_id),
        )
    }

    pub fn mission_not_found(mission_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::MissionNotFound,
            format!("Mission with id {} not found", mission_id),
        )
    }

    /// Targets are addressed through their mission, so both ids appear.
    pub fn target_not_found(target_id: impl fmt::Display, mission_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::TargetNotFound,
            format!("Target with id {} not found in mission {}", target_id, mission_id),
        )
    }

    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StateConflict, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn connection_pool_exhausted() -> Self {
        Self::from_code(ErrorCode::ConnectionPoolExhausted)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Query failures never leak SQL detail to the client; the full error goes
/// to the log instead.
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::database_error("Database operation failed")
    }
}

impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        match err {
            deadpool_postgres::PoolError::Timeout(_) => {
                ApiError::connection_pool_exhausted()
            }
            deadpool_postgres::PoolError::Closed => {
                ApiError::service_unavailable("Database connection pool is closed")
            }
            _ => ApiError::database_error("Failed to acquire database connection"),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

/// Outbound HTTP exists only for the breed catalog, so any transport or
/// status failure means the catalog is unavailable.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Breed catalog request failed: {:?}", err);
        ApiError::service_unavailable(format!("Failed to fetch breeds from the catalog: {}", err))
    }
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

/// Shorthand used by every fallible function in the crate.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::CatNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::MissionNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TargetNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::StateConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::ServiceUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ErrorCode::ConnectionPoolExhausted.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_error_constructors() {
        let err = ApiError::cat_not_found(42);
        assert_eq!(err.code, ErrorCode::CatNotFound);
        assert_eq!(err.message, "Cat with id 42 not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::target_not_found(7, 3);
        assert_eq!(err.code, ErrorCode::TargetNotFound);
        assert!(err.message.contains("7"));
        assert!(err.message.contains("mission 3"));

        let err = ApiError::missing_field("name");
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("name"));
    }

    #[test]
    fn test_api_error_with_details() {
        let details = serde_json::json!({
            "field": "targets",
            "constraint": "between 1 and 3 entries"
        });

        let err = ApiError::validation_failed("Invalid targets")
            .with_details(details.clone());

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details, Some(details));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::state_conflict("Mission already has a cat assigned");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("STATE_CONFLICT"));
        assert!(json.contains("Mission already has a cat assigned"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_from_code_uses_default_message() {
        let err = ApiError::from_code(ErrorCode::MissionNotFound);
        assert_eq!(err.message, "Mission not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::database_error("Connection failed");
        let display = format!("{}", err);

        assert!(display.contains("DatabaseError"));
        assert!(display.contains("Connection failed"));
    }
}
