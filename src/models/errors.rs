use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("menu not found")]
    MenuNotFound,

    #[error("submenu not found")]
    SubmenuNotFound,

    #[error("dish not found")]
    DishNotFound,

    #[error("A {entity} with the same name already exists")]
    DuplicateTitle { entity: &'static str },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Referenced parent row does not exist")]
    ParentNotFound,

    #[error("Invalid stored data: {message}")]
    InvalidData { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Timeout occurred during operation")]
    Timeout,
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => RepositoryError::ConstraintViolation {
                    message: db_err.message().to_string(),
                },
                Some(FOREIGN_KEY_VIOLATION) => RepositoryError::ParentNotFound,
                _ => RepositoryError::Database {
                    message: db_err.message().to_string(),
                },
            },
            sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                RepositoryError::ConnectionFailed
            }
            sqlx::Error::ColumnDecode { index, source } => RepositoryError::InvalidData {
                message: format!("column {}: {}", index, source),
            },
            other => RepositoryError::Database {
                message: other.to_string(),
            },
        }
    }
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
