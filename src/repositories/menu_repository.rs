use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Menu, MenuWithCounts, RepositoryResult};
use crate::observability::QueryTracer;

/// Trait defining the interface for menu data access operations
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Page of menus in insertion order with submenu and dish counts
    async fn find_all_with_counts(&self, offset: i64, limit: i64)
        -> RepositoryResult<Vec<MenuWithCounts>>;

    /// One menu with submenu and dish counts
    async fn find_with_counts(&self, id: Uuid) -> RepositoryResult<Option<MenuWithCounts>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>>;

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Menu>>;

    async fn create(&self, menu: Menu) -> RepositoryResult<Menu>;

    /// Persist title and description; `None` when the menu no longer exists
    async fn update(&self, menu: Menu) -> RepositoryResult<Option<Menu>>;

    /// Delete a menu and, through the store's cascade, its submenus and dishes
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of the MenuRepository trait
pub struct PgMenuRepository {
    pool: PgPool,
    tracer: QueryTracer,
}

#[derive(Debug, FromRow)]
struct MenuRow {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MenuCountsRow {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    submenus_count: i64,
    dishes_count: i64,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<MenuCountsRow> for MenuWithCounts {
    fn from(row: MenuCountsRow) -> Self {
        MenuWithCounts {
            menu: Menu {
                id: row.id,
                title: row.title,
                description: row.description,
                created_at: row.created_at,
            },
            submenus_count: row.submenus_count,
            dishes_count: row.dishes_count,
        }
    }
}

// Left joins keep childless menus; distinct counts stop the dish join
// from inflating the submenu count and vice versa.
const SELECT_MENUS_WITH_COUNTS: &str = r#"
    SELECT m.id, m.title, m.description, m.created_at,
           COUNT(DISTINCT s.id) AS submenus_count,
           COUNT(DISTINCT d.id) AS dishes_count
    FROM menus m
    LEFT JOIN submenus s ON s.menu_id = m.id
    LEFT JOIN dishes d ON d.submenu_id = s.id
"#;

impl PgMenuRepository {
    pub fn new(pool: PgPool, tracer: QueryTracer) -> Self {
        Self { pool, tracer }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn find_all_with_counts(
        &self,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<MenuWithCounts>> {
        let sql = format!(
            "{} GROUP BY m.id ORDER BY m.seq OFFSET $1 LIMIT $2",
            SELECT_MENUS_WITH_COUNTS
        );
        let rows: Vec<MenuCountsRow> = self
            .tracer
            .trace_operation(
                "select_with_counts",
                "menus",
                sqlx::query_as(&sql)
                    .bind(offset)
                    .bind(limit)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_with_counts(&self, id: Uuid) -> RepositoryResult<Option<MenuWithCounts>> {
        let sql = format!(
            "{} WHERE m.id = $1 GROUP BY m.id",
            SELECT_MENUS_WITH_COUNTS
        );
        let row: Option<MenuCountsRow> = self
            .tracer
            .trace_operation(
                "select_with_counts",
                "menus",
                sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Menu>> {
        let row: Option<MenuRow> = self
            .tracer
            .trace_operation(
                "select",
                "menus",
                sqlx::query_as(
                    "SELECT id, title, description, created_at FROM menus WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Menu>> {
        let row: Option<MenuRow> = self
            .tracer
            .trace_operation(
                "select_by_title",
                "menus",
                sqlx::query_as(
                    "SELECT id, title, description, created_at FROM menus WHERE title = $1",
                )
                .bind(title)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, menu: Menu) -> RepositoryResult<Menu> {
        self.tracer
            .trace_operation(
                "insert",
                "menus",
                sqlx::query(
                    "INSERT INTO menus (id, title, description, created_at) VALUES ($1, $2, $3, $4)",
                )
                .bind(menu.id)
                .bind(&menu.title)
                .bind(&menu.description)
                .bind(menu.created_at)
                .execute(&self.pool),
            )
            .await?;

        Ok(menu)
    }

    async fn update(&self, menu: Menu) -> RepositoryResult<Option<Menu>> {
        let result = self
            .tracer
            .trace_operation(
                "update",
                "menus",
                sqlx::query("UPDATE menus SET title = $2, description = $3 WHERE id = $1")
                    .bind(menu.id)
                    .bind(&menu.title)
                    .bind(&menu.description)
                    .execute(&self.pool),
            )
            .await?;

        Ok((result.rows_affected() > 0).then_some(menu))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = self
            .tracer
            .trace_operation(
                "delete",
                "menus",
                sqlx::query("DELETE FROM menus WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
