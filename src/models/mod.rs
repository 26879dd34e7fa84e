// Re-export all model types
pub use self::dish::*;
pub use self::errors::*;
pub use self::menu::*;
pub use self::price::*;
pub use self::submenu::*;
pub use self::validation::*;

mod dish;
mod errors;
mod menu;
mod price;
mod submenu;
mod validation;
