pub mod dish;
pub mod errors;
pub mod health;
pub mod menu;
pub mod metrics;
pub mod middleware;
pub mod submenu;

pub use errors::{service_error_to_response, ApiError, Pagination};
pub use health::*;
pub use metrics::*;
pub use middleware::*;
