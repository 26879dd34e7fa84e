use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{RepositoryResult, Submenu, SubmenuWithCounts};
use crate::observability::QueryTracer;

/// Trait defining the interface for submenu data access operations
#[async_trait]
pub trait SubmenuRepository: Send + Sync {
    /// Page of a menu's submenus in insertion order with dish counts
    async fn find_all_with_counts(
        &self,
        menu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SubmenuWithCounts>>;

    /// One submenu scoped to its menu, with its dish count
    async fn find_with_counts(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
    ) -> RepositoryResult<Option<SubmenuWithCounts>>;

    /// A submenu only if it belongs to the given menu
    async fn find_in_menu(&self, menu_id: Uuid, submenu_id: Uuid)
        -> RepositoryResult<Option<Submenu>>;

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Submenu>>;

    async fn create(&self, submenu: Submenu) -> RepositoryResult<Submenu>;

    async fn update(&self, submenu: Submenu) -> RepositoryResult<Option<Submenu>>;

    /// Delete a submenu and its dishes
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of the SubmenuRepository trait
pub struct PgSubmenuRepository {
    pool: PgPool,
    tracer: QueryTracer,
}

#[derive(Debug, FromRow)]
struct SubmenuRow {
    id: Uuid,
    menu_id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SubmenuCountsRow {
    id: Uuid,
    menu_id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    dishes_count: i64,
}

impl From<SubmenuRow> for Submenu {
    fn from(row: SubmenuRow) -> Self {
        Submenu {
            id: row.id,
            menu_id: row.menu_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<SubmenuCountsRow> for SubmenuWithCounts {
    fn from(row: SubmenuCountsRow) -> Self {
        SubmenuWithCounts {
            submenu: Submenu {
                id: row.id,
                menu_id: row.menu_id,
                title: row.title,
                description: row.description,
                created_at: row.created_at,
            },
            dishes_count: row.dishes_count,
        }
    }
}

const SUBMENU_COLUMNS: &str = "id, menu_id, title, description, created_at";

impl PgSubmenuRepository {
    pub fn new(pool: PgPool, tracer: QueryTracer) -> Self {
        Self { pool, tracer }
    }

    async fn count_dishes(&self, submenu_id: Uuid) -> RepositoryResult<i64> {
        let count: i64 = self
            .tracer
            .trace_operation(
                "count",
                "dishes",
                sqlx::query_scalar("SELECT COUNT(*) FROM dishes WHERE submenu_id = $1")
                    .bind(submenu_id)
                    .fetch_one(&self.pool),
            )
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl SubmenuRepository for PgSubmenuRepository {
    async fn find_all_with_counts(
        &self,
        menu_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<SubmenuWithCounts>> {
        let rows: Vec<SubmenuCountsRow> = self
            .tracer
            .trace_operation(
                "select_with_counts",
                "submenus",
                sqlx::query_as(
                    r#"
                    SELECT s.id, s.menu_id, s.title, s.description, s.created_at,
                           COUNT(d.id) AS dishes_count
                    FROM submenus s
                    LEFT JOIN dishes d ON d.submenu_id = s.id
                    WHERE s.menu_id = $1
                    GROUP BY s.id
                    ORDER BY s.seq
                    OFFSET $2 LIMIT $3
                    "#,
                )
                .bind(menu_id)
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_with_counts(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
    ) -> RepositoryResult<Option<SubmenuWithCounts>> {
        let Some(submenu) = self.find_in_menu(menu_id, submenu_id).await? else {
            return Ok(None);
        };

        let dishes_count = self.count_dishes(submenu.id).await?;

        Ok(Some(SubmenuWithCounts {
            submenu,
            dishes_count,
        }))
    }

    async fn find_in_menu(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
    ) -> RepositoryResult<Option<Submenu>> {
        let sql = format!(
            "SELECT {} FROM submenus WHERE id = $1 AND menu_id = $2",
            SUBMENU_COLUMNS
        );
        let row: Option<SubmenuRow> = self
            .tracer
            .trace_operation(
                "select",
                "submenus",
                sqlx::query_as(&sql)
                    .bind(submenu_id)
                    .bind(menu_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<Submenu>> {
        let sql = format!("SELECT {} FROM submenus WHERE title = $1", SUBMENU_COLUMNS);
        let row: Option<SubmenuRow> = self
            .tracer
            .trace_operation(
                "select_by_title",
                "submenus",
                sqlx::query_as(&sql).bind(title).fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, submenu: Submenu) -> RepositoryResult<Submenu> {
        self.tracer
            .trace_operation(
                "insert",
                "submenus",
                sqlx::query(
                    r#"
                    INSERT INTO submenus (id, menu_id, title, description, created_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(submenu.id)
                .bind(submenu.menu_id)
                .bind(&submenu.title)
                .bind(&submenu.description)
                .bind(submenu.created_at)
                .execute(&self.pool),
            )
            .await?;

        Ok(submenu)
    }

    async fn update(&self, submenu: Submenu) -> RepositoryResult<Option<Submenu>> {
        let result = self
            .tracer
            .trace_operation(
                "update",
                "submenus",
                sqlx::query("UPDATE submenus SET title = $2, description = $3 WHERE id = $1")
                    .bind(submenu.id)
                    .bind(&submenu.title)
                    .bind(&submenu.description)
                    .execute(&self.pool),
            )
            .await?;

        Ok((result.rows_affected() > 0).then_some(submenu))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = self
            .tracer
            .trace_operation(
                "delete",
                "submenus",
                sqlx::query("DELETE FROM submenus WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
