// Repositories module - data access layer

pub mod connection;
pub mod dish_repository;
pub mod memory;
pub mod menu_repository;
pub mod schema_manager;
pub mod submenu_repository;

pub use connection::create_pool;
pub use dish_repository::{DishRepository, PgDishRepository};
pub use memory::InMemoryCatalog;
pub use menu_repository::{MenuRepository, PgMenuRepository};
pub use schema_manager::SchemaManager;
pub use submenu_repository::{SubmenuRepository, PgSubmenuRepository};
