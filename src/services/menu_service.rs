use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{
    CreateMenuRequest, Menu, MenuView, ServiceError, ServiceResult, UpdateMenuRequest, Validate,
};
use crate::observability::Metrics;
use crate::repositories::MenuRepository;
use crate::services::{observe_write, write_error};

const ENTITY: &str = "menu";

/// Service for managing menus
pub struct MenuService {
    repository: Arc<dyn MenuRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl MenuService {
    pub fn new(repository: Arc<dyn MenuRepository>) -> Self {
        Self {
            repository,
            metrics: None,
        }
    }

    /// Create a new MenuService that counts write outcomes
    pub fn new_with_metrics(repository: Arc<dyn MenuRepository>, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            metrics: Some(metrics),
        }
    }

    /// List menus with their submenu and dish counts
    #[instrument(skip(self))]
    pub async fn list_menus(&self, offset: i64, limit: i64) -> ServiceResult<Vec<MenuView>> {
        crate::info_with_trace!("Listing menus");

        let menus = self.repository.find_all_with_counts(offset, limit).await?;

        crate::info_with_trace!("Found {} menus", menus.len());
        Ok(menus.iter().map(|m| m.to_view()).collect())
    }

    #[instrument(skip(self), fields(menu_id = %id))]
    pub async fn get_menu(&self, id: Uuid) -> ServiceResult<MenuView> {
        match self.repository.find_with_counts(id).await? {
            Some(menu) => Ok(menu.to_view()),
            None => {
                crate::warn_with_trace!("Menu not found");
                Err(ServiceError::MenuNotFound)
            }
        }
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_menu(&self, request: CreateMenuRequest) -> ServiceResult<MenuView> {
        let result = self.insert_menu(request).await;
        observe_write(&self.metrics, ENTITY, "create", result)
    }

    #[instrument(skip(self, request), fields(menu_id = %id))]
    pub async fn update_menu(
        &self,
        id: Uuid,
        request: UpdateMenuRequest,
    ) -> ServiceResult<MenuView> {
        let result = self.patch_menu(id, request).await;
        observe_write(&self.metrics, ENTITY, "update", result)
    }

    /// Delete a menu together with all of its submenus and dishes
    #[instrument(skip(self), fields(menu_id = %id))]
    pub async fn delete_menu(&self, id: Uuid) -> ServiceResult<()> {
        let result = self.remove_menu(id).await;
        observe_write(&self.metrics, ENTITY, "delete", result)
    }

    async fn insert_menu(&self, request: CreateMenuRequest) -> ServiceResult<MenuView> {
        crate::info_with_trace!("Creating new menu");

        request.validate()?;

        if self.repository.find_by_title(&request.title).await?.is_some() {
            crate::warn_with_trace!("Menu title already taken");
            return Err(ServiceError::DuplicateTitle { entity: ENTITY });
        }

        let menu = self
            .repository
            .create(Menu::new(request))
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::MenuNotFound))?;

        crate::info_with_trace!(menu_id = %menu.id, "Menu created successfully");
        Ok(menu.to_empty_view())
    }

    async fn patch_menu(&self, id: Uuid, request: UpdateMenuRequest) -> ServiceResult<MenuView> {
        let mut menu = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::MenuNotFound)?;

        request.validate()?;

        if let Some(title) = &request.title {
            if let Some(existing) = self.repository.find_by_title(title).await? {
                if existing.id != id {
                    return Err(ServiceError::DuplicateTitle { entity: ENTITY });
                }
            }
        }

        menu.update(request);
        self.repository
            .update(menu)
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::MenuNotFound))?
            .ok_or(ServiceError::MenuNotFound)?;

        crate::info_with_trace!("Menu updated successfully");
        self.get_menu(id).await
    }

    async fn remove_menu(&self, id: Uuid) -> ServiceResult<()> {
        if !self.repository.delete(id).await? {
            crate::warn_with_trace!("Menu to delete not found");
            return Err(ServiceError::MenuNotFound);
        }

        crate::info_with_trace!("Menu deleted successfully");
        Ok(())
    }
}
