// Services module - business logic layer

pub mod dish_service;
pub mod menu_service;
pub mod submenu_service;

pub use dish_service::DishService;
pub use menu_service::MenuService;
pub use submenu_service::SubmenuService;

use std::sync::Arc;

use crate::models::{RepositoryError, ServiceError, ServiceResult};
use crate::observability::Metrics;

/// Translate a store failure on insert or update into the caller-facing error.
/// Unique violations become duplicate-title conflicts and a vanished parent
/// becomes the parent's not-found error.
pub(crate) fn write_error(
    err: RepositoryError,
    entity: &'static str,
    missing_parent: ServiceError,
) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation { .. } => ServiceError::DuplicateTitle { entity },
        RepositoryError::ParentNotFound => missing_parent,
        other => other.into(),
    }
}

/// Count a write operation outcome when metrics are attached
pub(crate) fn observe_write<T>(
    metrics: &Option<Arc<Metrics>>,
    entity: &str,
    operation: &str,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    if let Some(metrics) = metrics {
        metrics.record_catalog_operation(entity, operation, result.is_ok());
    }
    result
}
