mod detail;
mod listing;
mod review;
mod write;

pub use listing::{LATEST_LIMIT, POPULAR_LIMIT};

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::model::{Category, Ingredient, Recipe, Step, UserId};
use crate::{Error, Result, schema};

/// Recipe storage backed by a SQLite pool.
///
/// Cloning is cheap, clones share the pool.
#[derive(Clone, Debug)]
pub struct RecipeStore {
    pool: SqlitePool,
}

impl RecipeStore {
    /// Connect to `url` and migrate the schema. The database file is created when missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds a single connection that is never recycled, since closing
    /// it would drop the database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, migrating the schema first.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        schema::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Register a user and return its id.
    pub async fn create_user(&self, name: &str) -> Result<UserId> {
        let id = sqlx::query("INSERT INTO users (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(UserId(id))
    }

    /// All categories, ordered by id.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    /// Fetch one recipe row without its relations.
    pub async fn find(&self, id: Uuid) -> Result<Recipe> {
        sqlx::query_as::<_, Recipe>(
            "SELECT id, title, description, image, views, category_id, user_id, created_at \
             FROM recipes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound(id))
    }

    /// Ingredients of a recipe in submission order.
    pub async fn ingredients(&self, id: Uuid) -> Result<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT name, quantity FROM ingredients WHERE recipe_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ingredients)
    }

    /// Steps of a recipe ordered by step number.
    pub async fn steps(&self, id: Uuid) -> Result<Vec<Step>> {
        let steps = sqlx::query_as::<_, Step>(
            "SELECT step_number, description FROM steps WHERE recipe_id = ? ORDER BY step_number",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(steps)
    }
}
