use chrono::Utc;
use uuid::Uuid;

use super::RecipeStore;
use crate::model::{ReviewDraft, UserId};
use crate::{Error, Result};

impl RecipeStore {
    /// Record `caller`'s review of a recipe. A user reviews a recipe at most once.
    pub async fn add_review(&self, caller: UserId, recipe: Uuid, draft: &ReviewDraft) -> Result<()> {
        draft.validate()?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes WHERE id = ?")
            .bind(recipe)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(Error::NotFound(recipe));
        }

        let inserted = sqlx::query(
            "INSERT INTO reviews (recipe_id, user_id, rating, comment, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(recipe)
        .bind(caller)
        .bind(draft.rating)
        .bind(draft.comment())
        .bind(Utc::now())
        .execute(&self.pool)
        .await;
        match inserted {
            Ok(_) => {
                tracing::debug!(%recipe, user = %caller, rating = draft.rating, "review added");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::AlreadyReviewed(recipe)),
            Err(e) => Err(e.into()),
        }
    }
}
