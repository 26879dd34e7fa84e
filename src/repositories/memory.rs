use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Dish, Menu, MenuWithCounts, RepositoryError, RepositoryResult, Submenu, SubmenuWithCounts,
};
use crate::repositories::{DishRepository, MenuRepository, SubmenuRepository};

#[derive(Debug, Default)]
struct CatalogState {
    menus: Vec<Menu>,
    submenus: Vec<Submenu>,
    dishes: Vec<Dish>,
}

impl CatalogState {
    fn submenus_of(&self, menu_id: Uuid) -> impl Iterator<Item = &Submenu> {
        self.submenus.iter().filter(move |s| s.menu_id == menu_id)
    }

    fn dishes_of(&self, submenu_id: Uuid) -> impl Iterator<Item = &Dish> {
        self.dishes.iter().filter(move |d| d.submenu_id == submenu_id)
    }

    fn menu_counts(&self, menu: &Menu) -> MenuWithCounts {
        let submenu_ids: Vec<Uuid> = self.submenus_of(menu.id).map(|s| s.id).collect();
        let dishes_count = self
            .dishes
            .iter()
            .filter(|d| submenu_ids.contains(&d.submenu_id))
            .count();

        MenuWithCounts {
            menu: menu.clone(),
            submenus_count: submenu_ids.len() as i64,
            dishes_count: dishes_count as i64,
        }
    }

    fn submenu_counts(&self, submenu: &Submenu) -> SubmenuWithCounts {
        SubmenuWithCounts {
            submenu: submenu.clone(),
            dishes_count: self.dishes_of(submenu.id).count() as i64,
        }
    }

    fn submenu_in_menu(&self, menu_id: Uuid, submenu_id: Uuid) -> Option<&Submenu> {
        self.submenus
            .iter()
            .find(|s| s.id == submenu_id && s.menu_id == menu_id)
    }
}

fn title_taken(entity: &str) -> RepositoryError {
    RepositoryError::ConstraintViolation {
        message: format!("duplicate {} title", entity),
    }
}

fn page<T>(items: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// Process-local catalog store with the same uniqueness, parent and cascade
/// rules as the relational schema. Lists keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuRepository for InMemoryCatalog {
    async fn find_all_with_counts(
        &self,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<MenuWithCounts>> {
        let state = self.state.read().await;
        let menus = state.menus.iter().map(|m| state.menu_counts(m));
        Ok(page(menus, offset, limit))
    }

    async fn find_with_counts(&self, id: Uuid) -> RepositoryResult<Option<MenuWithCounts>> {
        let state = self.state.read().await;
        Ok(state
            .menus
            .iter()
            .find(|m| m.id == id)
            .map(|m| state.menu_counts(m)))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>> {
        let state = self.state.read().await;
        Ok(state.menus.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Menu>> {
        let state = self.state.read().await;
        Ok(state.menus.iter().find(|m| m.title == title).cloned())
    }

    async fn create(&self, menu: Menu) -> RepositoryResult<Menu> {
        let mut state = self.state.write().await;
        if state.menus.iter().any(|m| m.title == menu.title) {
            return Err(title_taken("menu"));
        }
        state.menus.push(menu.clone());
        Ok(menu)
    }

    async fn update(&self, menu: Menu) -> RepositoryResult<Option<Menu>> {
        let mut state = self.state.write().await;
        if state
            .menus
            .iter()
            .any(|m| m.id != menu.id && m.title == menu.title)
        {
            return Err(title_taken("menu"));
        }

        let Some(stored) = state.menus.iter_mut().find(|m| m.id == menu.id) else {
            return Ok(None);
        };
        stored.title = menu.title.clone();
        stored.description = menu.description.clone();
        Ok(Some(menu))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let before = state.menus.len();
        state.menus.retain(|m| m.id != id);
        if state.menus.len() == before {
            return Ok(false);
        }

        let removed: Vec<Uuid> = state.submenus_of(id).map(|s| s.id).collect();
        state.submenus.retain(|s| s.menu_id != id);
        state.dishes.retain(|d| !removed.contains(&d.submenu_id));
        Ok(true)
    }
}

#[async_trait]
impl SubmenuRepository for InMemoryCatalog {
    async fn find_all_with_counts(
        &self,
        menu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SubmenuWithCounts>> {
        let state = self.state.read().await;
        let submenus = state.submenus_of(menu_id).map(|s| state.submenu_counts(s));
        Ok(page(submenus, offset, limit))
    }

    async fn find_with_counts(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
    ) -> RepositoryResult<Option<SubmenuWithCounts>> {
        let state = self.state.read().await;
        Ok(state
            .submenu_in_menu(menu_id, submenu_id)
            .map(|s| state.submenu_counts(s)))
    }

    async fn find_in_menu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
    ) -> RepositoryResult<Option<Submenu>> {
        let state = self.state.read().await;
        Ok(state.submenu_in_menu(menu_id, submenu_id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Submenu>> {
        let state = self.state.read().await;
        Ok(state.submenus.iter().find(|s| s.title == title).cloned())
    }

    async fn create(&self, submenu: Submenu) -> RepositoryResult<Submenu> {
        let mut state = self.state.write().await;
        if !state.menus.iter().any(|m| m.id == submenu.menu_id) {
            return Err(RepositoryError::ParentNotFound);
        }
        if state.submenus.iter().any(|s| s.title == submenu.title) {
            return Err(title_taken("submenu"));
        }
        state.submenus.push(submenu.clone());
        Ok(submenu)
    }

    async fn update(&self, submenu: Submenu) -> RepositoryResult<Option<Submenu>> {
        let mut state = self.state.write().await;
        if state
            .submenus
            .iter()
            .any(|s| s.id != submenu.id && s.title == submenu.title)
        {
            return Err(title_taken("submenu"));
        }

        let Some(stored) = state.submenus.iter_mut().find(|s| s.id == submenu.id) else {
            return Ok(None);
        };
        stored.title = submenu.title.clone();
        stored.description = submenu.description.clone();
        Ok(Some(submenu))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let before = state.submenus.len();
        state.submenus.retain(|s| s.id != id);
        if state.submenus.len() == before {
            return Ok(false);
        }

        state.dishes.retain(|d| d.submenu_id != id);
        Ok(true)
    }
}

#[async_trait]
impl DishRepository for InMemoryCatalog {
    async fn find_all(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<Dish>> {
        let state = self.state.read().await;
        if state.submenu_in_menu(menu_id, submenu_id).is_none() {
            return Ok(Vec::new());
        }
        Ok(page(state.dishes_of(submenu_id).cloned(), offset, limit))
    }

    async fn find_in_submenu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> RepositoryResult<Option<Dish>> {
        let state = self.state.read().await;
        if state.submenu_in_menu(menu_id, submenu_id).is_none() {
            return Ok(None);
        }
        let dish = state.dishes_of(submenu_id).find(|d| d.id == dish_id).cloned();
        Ok(dish)
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Dish>> {
        let state = self.state.read().await;
        Ok(state.dishes.iter().find(|d| d.title == title).cloned())
    }

    async fn create(&self, dish: Dish) -> RepositoryResult<Dish> {
        let mut state = self.state.write().await;
        if !state.submenus.iter().any(|s| s.id == dish.submenu_id) {
            return Err(RepositoryError::ParentNotFound);
        }
        if state.dishes.iter().any(|d| d.title == dish.title) {
            return Err(title_taken("dish"));
        }
        state.dishes.push(dish.clone());
        Ok(dish)
    }

    async fn update(&self, dish: Dish) -> RepositoryResult<Option<Dish>> {
        let mut state = self.state.write().await;
        if state
            .dishes
            .iter()
            .any(|d| d.id != dish.id && d.title == dish.title)
        {
            return Err(title_taken("dish"));
        }

        let Some(stored) = state.dishes.iter_mut().find(|d| d.id == dish.id) else {
            return Ok(None);
        };
        stored.title = dish.title.clone();
        stored.description = dish.description.clone();
        stored.price = dish.price;
        Ok(Some(dish))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let before = state.dishes.len();
        state.dishes.retain(|d| d.id != id);
        Ok(state.dishes.len() != before)
    }
}
