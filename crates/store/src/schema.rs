use sqlx::SqlitePool;

use crate::Result;

/// Table definitions and the seeded categories.
pub const SCHEMA: &str = include_str!("../sql/schema.sql");

/// Creates missing tables and seeds the categories.
///
/// Safe to run against an already migrated database.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("schema migrated");
    Ok(())
}
