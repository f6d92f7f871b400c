use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Value, json};

/// A single failed validation rule, reported back to the client as
/// `{ field, message }` inside the error envelope's `errors` array.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// ApiError
///
/// The application's error taxonomy. Every failure a handler can produce maps
/// to one of these variants, and each variant maps to exactly one HTTP status
/// and one client-safe message. Internal detail (SQL errors, token parse
/// failures) is logged server-side and never leaks into the response body.
#[derive(Debug)]
pub enum ApiError {
    /// 400 - a malformed request outside the rule tables (e.g. unparseable
    /// path coordinates).
    BadRequest(String),
    /// 400 - one or more declarative validation rules failed.
    Validation(Vec<FieldError>),
    /// 400 - a uniqueness invariant was violated (e.g. second review on the
    /// same place, already-registered email).
    Duplicate(String),
    /// 401 - missing/malformed/expired token, or the token's user is gone.
    Unauthorized(String),
    /// 403 - authenticated, but not the owner and not admin/superUser.
    Forbidden(String),
    /// 404 - the id did not resolve to a live resource.
    NotFound(String),
    /// 500 - unexpected store or runtime failure. Carries the internal detail
    /// for logging only; clients always see a generic message.
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message for the `message` field of the error envelope.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation(_) => "Validation failed",
            ApiError::Duplicate(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            // The internal detail stays on the server; see IntoResponse.
            ApiError::Internal(_) => "Server error",
        }
    }

    /// Render the uniform `{success:false, ...}` error envelope.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({
                "success": false,
                "errors": errors,
            }),
            _ => json!({
                "success": false,
                "message": self.message(),
            }),
        }
    }

    // Static constructors keep call sites terse.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        ApiError::Duplicate(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Internal(detail) => write!(f, "{}", detail),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ApiError {}

/// Map store-layer failures onto the taxonomy.
///
/// Unique-constraint violations (SQLSTATE 23505) become a 400 Duplicate: the
/// database constraint is the authority for the one-review-per-user-per-place
/// and unique-email invariants, and a race past the application pre-check must
/// still surface as a client error, not a 500. Everything else is logged and
/// collapsed into a generic Internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some("23505") {
                    return ApiError::duplicate("Duplicate resource");
                }
                tracing::error!("database error: {:?}", db_err);
                ApiError::internal(db_err.to_string())
            }
            _ => {
                tracing::error!("store error: {:?}", err);
                ApiError::internal(err.to_string())
            }
        }
    }
}

// Automatic HTTP response conversion for Axum.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            // Full detail server-side only; the client body stays generic.
            tracing::error!("internal error: {}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
