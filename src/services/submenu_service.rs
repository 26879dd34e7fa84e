use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{
    CreateSubmenuRequest, ServiceError, ServiceResult, Submenu, SubmenuView,
    UpdateSubmenuRequest, Validate,
};
use crate::observability::Metrics;
use crate::repositories::SubmenuRepository;
use crate::services::{observe_write, write_error};

const ENTITY: &str = "submenu";

/// Service for managing the submenus of a menu
pub struct SubmenuService {
    repository: Arc<dyn SubmenuRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl SubmenuService {
    pub fn new(repository: Arc<dyn SubmenuRepository>) -> Self {
        Self {
            repository,
            metrics: None,
        }
    }

    pub fn new_with_metrics(
        repository: Arc<dyn SubmenuRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            metrics: Some(metrics),
        }
    }

    /// List a menu's submenus; an unknown menu simply has none
    #[instrument(skip(self), fields(menu_id = %menu_id))]
    pub async fn list_submenus(
        &self,
        menu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> ServiceResult<Vec<SubmenuView>> {
        let submenus = self
            .repository
            .find_all_with_counts(menu_id, offset, limit)
            .await?;

        crate::info_with_trace!("Found {} submenus", submenus.len());
        Ok(submenus.iter().map(|s| s.to_view()).collect())
    }

    #[instrument(skip(self), fields(menu_id = %menu_id, submenu_id = %submenu_id))]
    pub async fn get_submenu(&self, menu_id: Uuid, submenu_id: Uuid) -> ServiceResult<SubmenuView> {
        match self.repository.find_with_counts(menu_id, submenu_id).await? {
            Some(submenu) => Ok(submenu.to_view()),
            None => {
                crate::warn_with_trace!("Submenu not found");
                Err(ServiceError::SubmenuNotFound)
            }
        }
    }

    #[instrument(skip(self, request), fields(menu_id = %menu_id, title = %request.title))]
    pub async fn create_submenu(
        &self,
        menu_id: Uuid,
        request: CreateSubmenuRequest,
    ) -> ServiceResult<SubmenuView> {
        let result = self.insert_submenu(menu_id, request).await;
        observe_write(&self.metrics, ENTITY, "create", result)
    }

    #[instrument(skip(self, request), fields(menu_id = %menu_id, submenu_id = %submenu_id))]
    pub async fn update_submenu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        request: UpdateSubmenuRequest,
    ) -> ServiceResult<SubmenuView> {
        let result = self.patch_submenu(menu_id, submenu_id, request).await;
        observe_write(&self.metrics, ENTITY, "update", result)
    }

    /// Delete a submenu together with its dishes
    #[instrument(skip(self), fields(menu_id = %menu_id, submenu_id = %submenu_id))]
    pub async fn delete_submenu(&self, menu_id: Uuid, submenu_id: Uuid) -> ServiceResult<()> {
        let result = self.remove_submenu(menu_id, submenu_id).await;
        observe_write(&self.metrics, ENTITY, "delete", result)
    }

    async fn insert_submenu(
        &self,
        menu_id: Uuid,
        request: CreateSubmenuRequest,
    ) -> ServiceResult<SubmenuView> {
        crate::info_with_trace!("Creating new submenu");

        request.validate()?;

        if self.repository.find_by_title(&request.title).await?.is_some() {
            crate::warn_with_trace!("Submenu title already taken");
            return Err(ServiceError::DuplicateTitle { entity: ENTITY });
        }

        // The store rejects the insert when the menu does not exist
        let submenu = self
            .repository
            .create(Submenu::new(menu_id, request))
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::MenuNotFound))?;

        crate::info_with_trace!(submenu_id = %submenu.id, "Submenu created successfully");
        Ok(submenu.to_empty_view())
    }

    async fn patch_submenu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        request: UpdateSubmenuRequest,
    ) -> ServiceResult<SubmenuView> {
        let mut submenu = self
            .repository
            .find_in_menu(menu_id, submenu_id)
            .await?
            .ok_or(ServiceError::SubmenuNotFound)?;

        request.validate()?;

        if let Some(title) = &request.title {
            if let Some(existing) = self.repository.find_by_title(title).await? {
                if existing.id != submenu_id {
                    return Err(ServiceError::DuplicateTitle { entity: ENTITY });
                }
            }
        }

        submenu.update(request);
        self.repository
            .update(submenu)
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::MenuNotFound))?
            .ok_or(ServiceError::SubmenuNotFound)?;

        crate::info_with_trace!("Submenu updated successfully");
        self.get_submenu(menu_id, submenu_id).await
    }

    async fn remove_submenu(&self, menu_id: Uuid, submenu_id: Uuid) -> ServiceResult<()> {
        if self
            .repository
            .find_in_menu(menu_id, submenu_id)
            .await?
            .is_none()
        {
            crate::warn_with_trace!("Submenu to delete not found");
            return Err(ServiceError::SubmenuNotFound);
        }

        if !self.repository.delete(submenu_id).await? {
            return Err(ServiceError::SubmenuNotFound);
        }

        crate::info_with_trace!("Submenu deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RepositoryError, RepositoryResult, SubmenuWithCounts};
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};

    mock! {
        SubmenuRepo {}

        #[async_trait]
        impl SubmenuRepository for SubmenuRepo {
            async fn find_all_with_counts(&self, menu_id: Uuid, offset: i64, limit: i64) -> RepositoryResult<Vec<SubmenuWithCounts>>;
            async fn find_with_counts(&self, menu_id: Uuid, submenu_id: Uuid) -> RepositoryResult<Option<SubmenuWithCounts>>;
            async fn find_in_menu(&self, menu_id: Uuid, submenu_id: Uuid) -> RepositoryResult<Option<Submenu>>;
            async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Submenu>>;
            async fn create(&self, submenu: Submenu) -> RepositoryResult<Submenu>;
            async fn update(&self, submenu: Submenu) -> RepositoryResult<Option<Submenu>>;
            async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
        }
    }

    fn create_test_submenu(menu_id: Uuid, title: &str) -> Submenu {
        Submenu::new(
            menu_id,
            CreateSubmenuRequest {
                title: title.to_string(),
                description: "Some description".to_string(),
            },
        )
    }

    fn create_request() -> CreateSubmenuRequest {
        CreateSubmenuRequest {
            title: "First submenu".to_string(),
            description: "Some description".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_submenu_missing_menu() {
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo.expect_find_by_title().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::ParentNotFound));

        let service = SubmenuService::new(Arc::new(mock_repo));
        let result = service
            .create_submenu(Uuid::new_v4(), create_request())
            .await;

        assert!(matches!(result, Err(ServiceError::MenuNotFound)));
    }

    #[tokio::test]
    async fn test_create_submenu_keeps_parent() {
        let menu_id = Uuid::new_v4();
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo.expect_find_by_title().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(move |submenu| submenu.menu_id == menu_id)
            .times(1)
            .returning(|submenu| Ok(submenu));

        let service = SubmenuService::new(Arc::new(mock_repo));
        let view = service.create_submenu(menu_id, create_request()).await.unwrap();

        assert_eq!(view.title, "First submenu");
        assert_eq!(view.dishes_count, 0);
    }

    #[tokio::test]
    async fn test_create_submenu_duplicate_title() {
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo
            .expect_find_by_title()
            .with(eq("First submenu"))
            .returning(|title| Ok(Some(create_test_submenu(Uuid::new_v4(), title))));
        mock_repo.expect_create().never();

        let service = SubmenuService::new(Arc::new(mock_repo));
        let result = service
            .create_submenu(Uuid::new_v4(), create_request())
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::DuplicateTitle { entity: "submenu" })
        ));
    }

    #[tokio::test]
    async fn test_get_submenu_outside_menu() {
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo
            .expect_find_with_counts()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = SubmenuService::new(Arc::new(mock_repo));
        let result = service.get_submenu(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::SubmenuNotFound)));
    }

    #[tokio::test]
    async fn test_update_submenu_returns_fresh_counts() {
        let menu_id = Uuid::new_v4();
        let submenu = create_test_submenu(menu_id, "First submenu");
        let submenu_id = submenu.id;
        let stored = submenu.clone();

        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo
            .expect_find_in_menu()
            .with(eq(menu_id), eq(submenu_id))
            .returning(move |_, _| Ok(Some(stored.clone())));
        mock_repo
            .expect_update()
            .withf(|s| s.title == "First submenu" && s.description == "Updated")
            .times(1)
            .returning(|s| Ok(Some(s)));
        mock_repo.expect_find_with_counts().returning(move |_, _| {
            let mut updated = submenu.clone();
            updated.description = "Updated".to_string();
            Ok(Some(SubmenuWithCounts {
                submenu: updated,
                dishes_count: 3,
            }))
        });

        let service = SubmenuService::new(Arc::new(mock_repo));
        let view = service
            .update_submenu(
                menu_id,
                submenu_id,
                UpdateSubmenuRequest {
                    description: Some("Updated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.description, "Updated");
        assert_eq!(view.dishes_count, 3);
    }

    #[tokio::test]
    async fn test_delete_submenu_outside_menu() {
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo.expect_find_in_menu().returning(|_, _| Ok(None));
        mock_repo.expect_delete().never();

        let service = SubmenuService::new(Arc::new(mock_repo));
        let result = service
            .delete_submenu(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(ServiceError::SubmenuNotFound)));
    }

    #[tokio::test]
    async fn test_list_submenus_repository_failure() {
        let mut mock_repo = MockSubmenuRepo::new();
        mock_repo
            .expect_find_all_with_counts()
            .returning(|_, _, _| Err(RepositoryError::ConnectionFailed));

        let service = SubmenuService::new(Arc::new(mock_repo));
        let result = service.list_submenus(Uuid::new_v4(), 0, 10).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repository {
                source: RepositoryError::ConnectionFailed
            })
        ));
    }
}
