use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mid-level catalog entry, owned by a menu and owning dishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submenu {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuWithCounts {
    pub submenu: Submenu,
    pub dishes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmenuRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSubmenuRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Response model for a submenu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmenuView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub dishes_count: i64,
}

impl Submenu {
    pub fn new(menu_id: Uuid, request: CreateSubmenuRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            menu_id,
            title: request.title,
            description: request.description,
            created_at: Utc::now(),
        }
    }

    pub fn update(&mut self, request: UpdateSubmenuRequest) {
        if let Some(title) = request.title {
            self.title = title;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
    }

    pub fn to_empty_view(&self) -> SubmenuView {
        SubmenuWithCounts {
            submenu: self.clone(),
            dishes_count: 0,
        }
        .to_view()
    }
}

impl SubmenuWithCounts {
    pub fn to_view(&self) -> SubmenuView {
        SubmenuView {
            id: self.submenu.id,
            title: self.submenu.title.clone(),
            description: self.submenu.description.clone(),
            dishes_count: self.dishes_count,
        }
    }
}
