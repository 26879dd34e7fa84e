use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Dish, RepositoryResult};
use crate::observability::QueryTracer;

/// Trait defining the interface for dish data access operations.
///
/// Lookups are scoped by both ancestors: a dish is only visible through the
/// submenu that owns it, and that submenu only through its own menu.
#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn find_all(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<Dish>>;

    async fn find_in_submenu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> RepositoryResult<Option<Dish>>;

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Dish>>;

    async fn create(&self, dish: Dish) -> RepositoryResult<Dish>;

    async fn update(&self, dish: Dish) -> RepositoryResult<Option<Dish>>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of the DishRepository trait
pub struct PgDishRepository {
    pool: PgPool,
    tracer: QueryTracer,
}

#[derive(Debug, FromRow)]
struct DishRow {
    id: Uuid,
    submenu_id: Uuid,
    title: String,
    description: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            submenu_id: row.submenu_id,
            title: row.title,
            description: row.description,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

const SELECT_SCOPED_DISHES: &str = r#"
    SELECT d.id, d.submenu_id, d.title, d.description, d.price, d.created_at
    FROM dishes d
    JOIN submenus s ON s.id = d.submenu_id
    WHERE s.menu_id = $1 AND d.submenu_id = $2
"#;

impl PgDishRepository {
    pub fn new(pool: PgPool, tracer: QueryTracer) -> Self {
        Self { pool, tracer }
    }
}

#[async_trait]
impl DishRepository for PgDishRepository {
    async fn find_all(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<Dish>> {
        let sql = format!("{} ORDER BY d.seq OFFSET $3 LIMIT $4", SELECT_SCOPED_DISHES);
        let rows: Vec<DishRow> = self
            .tracer
            .trace_operation(
                "select",
                "dishes",
                sqlx::query_as(&sql)
                    .bind(menu_id)
                    .bind(submenu_id)
                    .bind(offset)
                    .bind(limit)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_in_submenu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> RepositoryResult<Option<Dish>> {
        let sql = format!("{} AND d.id = $3", SELECT_SCOPED_DISHES);
        let row: Option<DishRow> = self
            .tracer
            .trace_operation(
                "select",
                "dishes",
                sqlx::query_as(&sql)
                    .bind(menu_id)
                    .bind(submenu_id)
                    .bind(dish_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Dish>> {
        let row: Option<DishRow> = self
            .tracer
            .trace_operation(
                "select_by_title",
                "dishes",
                sqlx::query_as(
                    r#"
                    SELECT id, submenu_id, title, description, price, created_at
                    FROM dishes
                    WHERE title = $1
                    "#,
                )
                .bind(title)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, dish: Dish) -> RepositoryResult<Dish> {
        self.tracer
            .trace_operation(
                "insert",
                "dishes",
                sqlx::query(
                    r#"
                    INSERT INTO dishes (id, submenu_id, title, description, price, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(dish.id)
                .bind(dish.submenu_id)
                .bind(&dish.title)
                .bind(&dish.description)
                .bind(dish.price)
                .bind(dish.created_at)
                .execute(&self.pool),
            )
            .await?;

        Ok(dish)
    }

    async fn update(&self, dish: Dish) -> RepositoryResult<Option<Dish>> {
        let result = self
            .tracer
            .trace_operation(
                "update",
                "dishes",
                sqlx::query(
                    "UPDATE dishes SET title = $2, description = $3, price = $4 WHERE id = $1",
                )
                .bind(dish.id)
                .bind(&dish.title)
                .bind(&dish.description)
                .bind(dish.price)
                .execute(&self.pool),
            )
            .await?;

        Ok((result.rows_affected() > 0).then_some(dish))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = self
            .tracer
            .trace_operation(
                "delete",
                "dishes",
                sqlx::query("DELETE FROM dishes WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
