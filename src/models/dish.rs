use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::{format_price, normalize_price};

/// Leaf catalog entry with a price, owned by a submenu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub submenu_id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored at four fraction digits
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Request model for creating a dish. `price` may be sent as a JSON string or number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDishRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDishRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Response model for a dish; `price` always carries two fraction digits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: String,
}

impl Dish {
    pub fn new(submenu_id: Uuid, request: CreateDishRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            submenu_id,
            title: request.title,
            description: request.description,
            price: normalize_price(request.price),
            created_at: Utc::now(),
        }
    }

    pub fn update(&mut self, request: UpdateDishRequest) {
        if let Some(title) = request.title {
            self.title = title;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(price) = request.price {
            self.price = normalize_price(price);
        }
    }

    pub fn to_view(&self) -> DishView {
        DishView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            price: format_price(self.price),
        }
    }
}
