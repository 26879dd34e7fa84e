use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level catalog entry owning submenus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A menu together with counts derived from its live children
#[derive(Debug, Clone, PartialEq)]
pub struct MenuWithCounts {
    pub menu: Menu,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

/// Request model for creating a new menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuRequest {
    pub title: String,
    pub description: String,
}

/// Request model for patching a menu; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateMenuRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Response model for a menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

impl Menu {
    /// Create a new Menu with a generated ID
    pub fn new(request: CreateMenuRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            created_at: Utc::now(),
        }
    }

    /// Apply the supplied fields of an update request
    pub fn update(&mut self, request: UpdateMenuRequest) {
        if let Some(title) = request.title {
            self.title = title;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
    }

    /// View of a menu that has no children yet
    pub fn to_empty_view(&self) -> MenuView {
        MenuWithCounts {
            menu: self.clone(),
            submenus_count: 0,
            dishes_count: 0,
        }
        .to_view()
    }
}

impl MenuWithCounts {
    pub fn to_view(&self) -> MenuView {
        MenuView {
            id: self.menu.id,
            title: self.menu.title.clone(),
            description: self.menu.description.clone(),
            submenus_count: self.submenus_count,
            dishes_count: self.dishes_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_menu() -> Menu {
        Menu::new(CreateMenuRequest {
            title: "First menu".to_string(),
            description: "Some description".to_string(),
        })
    }

    #[test]
    fn test_menu_creation() {
        let menu = create_test_menu();
        let other = create_test_menu();

        assert_eq!(menu.title, "First menu");
        assert_eq!(menu.description, "Some description");
        assert_ne!(menu.id, other.id);
    }

    #[test]
    fn test_partial_update_keeps_description() {
        let mut menu = create_test_menu();

        menu.update(UpdateMenuRequest {
            title: Some("First menu updated".to_string()),
            ..Default::default()
        });

        assert_eq!(menu.title, "First menu updated");
        assert_eq!(menu.description, "Some description");
    }

    #[test]
    fn test_partial_update_keeps_title() {
        let mut menu = create_test_menu();
        let id = menu.id;

        menu.update(UpdateMenuRequest {
            description: Some("Some description updated".to_string()),
            ..Default::default()
        });

        assert_eq!(menu.id, id);
        assert_eq!(menu.title, "First menu");
        assert_eq!(menu.description, "Some description updated");
    }

    #[test]
    fn test_view_serialization() {
        let menu = create_test_menu();
        let json = serde_json::to_value(menu.to_empty_view()).unwrap();

        assert_eq!(json["id"], menu.id.to_string());
        assert_eq!(json["title"], "First menu");
        assert_eq!(json["submenus_count"], 0);
        assert_eq!(json["dishes_count"], 0);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_update_request_accepts_missing_fields() {
        let request: UpdateMenuRequest =
            serde_json::from_str(r#"{"title": "Only title"}"#).unwrap();

        assert_eq!(request.title.as_deref(), Some("Only title"));
        assert!(request.description.is_none());
    }
}
