use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{RepositoryError, ServiceError};

/// Error half of every catalog handler's return type
pub type ApiError = (StatusCode, Json<Value>);

const DEFAULT_PAGE_LIMIT: u32 = 10;

/// `skip`/`limit` query parameters for list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn bounds(&self) -> (i64, i64) {
        (i64::from(self.skip), i64::from(self.limit))
    }
}

/// Parse an id taken from the request path. A malformed id can never match a
/// stored row, so it is mapped to the nil UUID and resolves as "not found".
pub fn path_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or(Uuid::nil())
}

/// Body for successful deletes
pub fn deleted(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{} deleted successfully", entity) }))
}

/// Convert ServiceError to HTTP response
pub fn service_error_to_response(err: ServiceError) -> ApiError {
    let (status, detail) = match &err {
        ServiceError::MenuNotFound
        | ServiceError::SubmenuNotFound
        | ServiceError::DishNotFound => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::DuplicateTitle { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::ValidationError { message } => {
            (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
        }
        ServiceError::Repository { source } => match source {
            RepositoryError::ConnectionFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection failed".to_string(),
            ),
            RepositoryError::Timeout => {
                (StatusCode::REQUEST_TIMEOUT, "Request timeout".to_string())
            }
            RepositoryError::ConstraintViolation { .. } => {
                (StatusCode::BAD_REQUEST, "Constraint violation".to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
    };

    if status.is_server_error() {
        crate::error_with_trace!(error = %err, "Catalog request failed");
    }

    (status, Json(json!({ "detail": detail })))
}
