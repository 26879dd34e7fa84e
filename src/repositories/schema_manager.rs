use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::models::RepositoryResult;

const CREATE_STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS menus (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        title VARCHAR NOT NULL UNIQUE,
        description VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS submenus (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        menu_id UUID NOT NULL REFERENCES menus (id) ON DELETE CASCADE,
        title VARCHAR NOT NULL UNIQUE,
        description VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dishes (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        submenu_id UUID NOT NULL REFERENCES submenus (id) ON DELETE CASCADE,
        title VARCHAR NOT NULL UNIQUE,
        description VARCHAR NOT NULL,
        price NUMERIC(10, 4) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

// Children first so foreign keys never dangle mid-drop
const DROP_STATEMENTS: [&str; 3] = [
    "DROP TABLE IF EXISTS dishes",
    "DROP TABLE IF EXISTS submenus",
    "DROP TABLE IF EXISTS menus",
];

const INDEX_STATEMENTS: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS submenus_menu_id_idx ON submenus (menu_id)",
    "CREATE INDEX IF NOT EXISTS dishes_submenu_id_idx ON dishes (submenu_id)",
];

/// Manages the catalog tables
pub struct SchemaManager {
    pool: PgPool,
}

impl SchemaManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create any missing tables and indexes, leaving existing data alone
    #[instrument(skip(self))]
    pub async fn create_schema(&self) -> RepositoryResult<()> {
        info!("Ensuring catalog tables exist");

        let mut tx = self.pool.begin().await?;
        for statement in CREATE_STATEMENTS.iter().chain(INDEX_STATEMENTS.iter()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Catalog tables ready");
        Ok(())
    }

    /// Drop every catalog table and recreate it empty
    #[instrument(skip(self))]
    pub async fn reset_schema(&self) -> RepositoryResult<()> {
        warn!("Dropping catalog tables, all stored data will be lost");

        let mut tx = self.pool.begin().await?;
        for statement in DROP_STATEMENTS {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        self.create_schema().await
    }
}
