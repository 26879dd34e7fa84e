use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{
    CreateDishRequest, Dish, DishView, ServiceError, ServiceResult, UpdateDishRequest, Validate,
};
use crate::observability::Metrics;
use crate::repositories::{DishRepository, SubmenuRepository};
use crate::services::{observe_write, write_error};

const ENTITY: &str = "dish";

/// Service for managing dishes. Every lookup is scoped to the full
/// menu/submenu chain from the request path.
pub struct DishService {
    repository: Arc<dyn DishRepository>,
    submenus: Arc<dyn SubmenuRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl DishService {
    pub fn new(repository: Arc<dyn DishRepository>, submenus: Arc<dyn SubmenuRepository>) -> Self {
        Self {
            repository,
            submenus,
            metrics: None,
        }
    }

    pub fn new_with_metrics(
        repository: Arc<dyn DishRepository>,
        submenus: Arc<dyn SubmenuRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            submenus,
            metrics: Some(metrics),
        }
    }

    #[instrument(skip(self), fields(menu_id = %menu_id, submenu_id = %submenu_id))]
    pub async fn list_dishes(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> ServiceResult<Vec<DishView>> {
        let dishes = self
            .repository
            .find_all(menu_id, submenu_id, offset, limit)
            .await?;

        crate::info_with_trace!("Found {} dishes", dishes.len());
        Ok(dishes.iter().map(Dish::to_view).collect())
    }

    #[instrument(skip(self), fields(menu_id = %menu_id, submenu_id = %submenu_id, dish_id = %dish_id))]
    pub async fn get_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> ServiceResult<DishView> {
        Ok(self.find_scoped(menu_id, submenu_id, dish_id).await?.to_view())
    }

    #[instrument(skip(self, request), fields(
        menu_id = %menu_id,
        submenu_id = %submenu_id,
        title = %request.title,
    ))]
    pub async fn create_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        request: CreateDishRequest,
    ) -> ServiceResult<DishView> {
        let result = self.insert_dish(menu_id, submenu_id, request).await;
        observe_write(&self.metrics, ENTITY, "create", result)
    }

    #[instrument(skip(self, request), fields(menu_id = %menu_id, submenu_id = %submenu_id, dish_id = %dish_id))]
    pub async fn update_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
        request: UpdateDishRequest,
    ) -> ServiceResult<DishView> {
        let result = self
            .patch_dish(menu_id, submenu_id, dish_id, request)
            .await;
        observe_write(&self.metrics, ENTITY, "update", result)
    }

    #[instrument(skip(self), fields(menu_id = %menu_id, submenu_id = %submenu_id, dish_id = %dish_id))]
    pub async fn delete_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> ServiceResult<()> {
        let result = self.remove_dish(menu_id, submenu_id, dish_id).await;
        observe_write(&self.metrics, ENTITY, "delete", result)
    }

    async fn find_scoped(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> ServiceResult<Dish> {
        match self
            .repository
            .find_in_submenu(menu_id, submenu_id, dish_id)
            .await?
        {
            Some(dish) => Ok(dish),
            None => {
                crate::warn_with_trace!("Dish not found");
                Err(ServiceError::DishNotFound)
            }
        }
    }

    async fn insert_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        request: CreateDishRequest,
    ) -> ServiceResult<DishView> {
        crate::info_with_trace!("Creating new dish");

        request.validate()?;

        if self
            .submenus
            .find_in_menu(menu_id, submenu_id)
            .await?
            .is_none()
        {
            crate::warn_with_trace!("Parent submenu not found");
            return Err(ServiceError::SubmenuNotFound);
        }

        if self.repository.find_by_title(&request.title).await?.is_some() {
            crate::warn_with_trace!("Dish title already taken");
            return Err(ServiceError::DuplicateTitle { entity: ENTITY });
        }

        let dish = self
            .repository
            .create(Dish::new(submenu_id, request))
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::SubmenuNotFound))?;

        crate::info_with_trace!(dish_id = %dish.id, price = %dish.price, "Dish created successfully");
        Ok(dish.to_view())
    }

    async fn patch_dish(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
        request: UpdateDishRequest,
    ) -> ServiceResult<DishView> {
        let mut dish = self.find_scoped(menu_id, submenu_id, dish_id).await?;

        request.validate()?;

        if let Some(title) = &request.title {
            if let Some(existing) = self.repository.find_by_title(title).await? {
                if existing.id != dish_id {
                    return Err(ServiceError::DuplicateTitle { entity: ENTITY });
                }
            }
        }

        dish.update(request);
        let dish = self
            .repository
            .update(dish)
            .await
            .map_err(|e| write_error(e, ENTITY, ServiceError::SubmenuNotFound))?
            .ok_or(ServiceError::DishNotFound)?;

        crate::info_with_trace!("Dish updated successfully");
        Ok(dish.to_view())
    }

    async fn remove_dish(&self, menu_id: Uuid, submenu_id: Uuid, dish_id: Uuid) -> ServiceResult<()> {
        self.find_scoped(menu_id, submenu_id, dish_id).await?;

        if !self.repository.delete(dish_id).await? {
            return Err(ServiceError::DishNotFound);
        }

        crate::info_with_trace!("Dish deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateSubmenuRequest, RepositoryResult, Submenu, SubmenuWithCounts,
    };
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};
    use rust_decimal_macros::dec;

    mock! {
        DishRepo {}

        #[async_trait]
        impl DishRepository for DishRepo {
            async fn find_all(&self, menu_id: Uuid, submenu_id: Uuid, offset: i64, limit: i64) -> RepositoryResult<Vec<Dish>>;
            async fn find_in_submenu(&self, menu_id: Uuid, submenu_id: Uuid, dish_id: Uuid) -> RepositoryResult<Option<Dish>>;
            async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Dish>>;
            async fn create(&self, dish: Dish) -> RepositoryResult<Dish>;
            async fn update(&self, dish: Dish) -> RepositoryResult<Option<Dish>>;
            async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
        }
    }

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

    fn create_test_dish(submenu_id: Uuid) -> Dish {
        Dish::new(
            submenu_id,
            CreateDishRequest {
                title: "First dish".to_string(),
                description: "Some description".to_string(),
                price: dec!(123.456),
            },
        )
    }

    fn submenus_with_parent(menu_id: Uuid) -> MockSubmenuRepo {
        let mut submenus = MockSubmenuRepo::new();
        submenus.expect_find_in_menu().returning(move |_, submenu_id| {
            let mut submenu = Submenu::new(
                menu_id,
                CreateSubmenuRequest {
                    title: "Submenu".to_string(),
                    description: "Some description".to_string(),
                },
            );
            submenu.id = submenu_id;
            Ok(Some(submenu))
        });
        submenus
    }

    #[tokio::test]
    async fn test_create_dish_formats_price() {
        let menu_id = Uuid::new_v4();
        let submenu_id = Uuid::new_v4();

        let mut mock_repo = MockDishRepo::new();
        mock_repo.expect_find_by_title().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(move |dish| dish.submenu_id == submenu_id && dish.price == dec!(123.4560))
            .times(1)
            .returning(|dish| Ok(dish));

        let service = DishService::new(
            Arc::new(mock_repo),
            Arc::new(submenus_with_parent(menu_id)),
        );
        let view = service
            .create_dish(
                menu_id,
                submenu_id,
                CreateDishRequest {
                    title: "First dish".to_string(),
                    description: "Some description".to_string(),
                    price: dec!(123.456),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.price, "123.46");
    }

    #[tokio::test]
    async fn test_create_dish_missing_submenu() {
        let mut submenus = MockSubmenuRepo::new();
        submenus.expect_find_in_menu().returning(|_, _| Ok(None));
        let mut mock_repo = MockDishRepo::new();
        mock_repo.expect_create().never();

        let service = DishService::new(Arc::new(mock_repo), Arc::new(submenus));
        let result = service
            .create_dish(
                Uuid::new_v4(),
                Uuid::new_v4(),
                CreateDishRequest {
                    title: "First dish".to_string(),
                    description: "Some description".to_string(),
                    price: dec!(1),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::SubmenuNotFound)));
    }

    #[tokio::test]
    async fn test_create_dish_negative_price() {
        let service = DishService::new(
            Arc::new(MockDishRepo::new()),
            Arc::new(MockSubmenuRepo::new()),
        );
        let result = service
            .create_dish(
                Uuid::new_v4(),
                Uuid::new_v4(),
                CreateDishRequest {
                    title: "First dish".to_string(),
                    description: "Some description".to_string(),
                    price: dec!(-1.50),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_get_dish_outside_scope() {
        let mut mock_repo = MockDishRepo::new();
        mock_repo
            .expect_find_in_submenu()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let service = DishService::new(Arc::new(mock_repo), Arc::new(MockSubmenuRepo::new()));
        let result = service
            .get_dish(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(ServiceError::DishNotFound)));
    }

    #[tokio::test]
    async fn test_update_dish_price_only() {
        let submenu_id = Uuid::new_v4();
        let dish = create_test_dish(submenu_id);
        let dish_id = dish.id;

        let mut mock_repo = MockDishRepo::new();
        mock_repo
            .expect_find_in_submenu()
            .with(always(), eq(submenu_id), eq(dish_id))
            .returning(move |_, _, _| Ok(Some(dish.clone())));
        mock_repo
            .expect_update()
            .withf(|d| d.title == "First dish" && d.price == dec!(654.1230))
            .times(1)
            .returning(|d| Ok(Some(d)));

        let service = DishService::new(Arc::new(mock_repo), Arc::new(MockSubmenuRepo::new()));
        let view = service
            .update_dish(
                Uuid::new_v4(),
                submenu_id,
                dish_id,
                UpdateDishRequest {
                    price: Some(dec!(654.123)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.title, "First dish");
        assert_eq!(view.price, "654.12");
    }

    #[tokio::test]
    async fn test_delete_dish_success() {
        let submenu_id = Uuid::new_v4();
        let dish = create_test_dish(submenu_id);
        let dish_id = dish.id;

        let mut mock_repo = MockDishRepo::new();
        mock_repo
            .expect_find_in_submenu()
            .returning(move |_, _, _| Ok(Some(dish.clone())));
        mock_repo
            .expect_delete()
            .with(eq(dish_id))
            .times(1)
            .returning(|_| Ok(true));

        let service = DishService::new(Arc::new(mock_repo), Arc::new(MockSubmenuRepo::new()));
        let result = service
            .delete_dish(Uuid::new_v4(), submenu_id, dish_id)
            .await;

        assert!(result.is_ok());
    }
}
