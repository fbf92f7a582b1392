use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::RecipeStore;
use crate::filter::fold_title;
use crate::model::{CategoryId, EditForm, Ingredient, RecipeDraft, UserId};
use crate::{Error, Result};

impl RecipeStore {
    /// Create a recipe owned by `caller` with all of its ingredients and steps.
    ///
    /// The id is generated before the transaction starts so the child rows can
    /// reference it. Either every row is written or none is.
    pub async fn create(&self, caller: UserId, draft: &RecipeDraft) -> Result<Uuid> {
        draft.validate()?;
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;
        let outcome = insert_recipe(&mut tx, id, caller, draft).await;
        settle(tx, outcome, "create", id).await?;
        debug!(recipe = %id, user = %caller, "recipe created");
        Ok(id)
    }

    /// Load a recipe for editing. Only its owner may do so.
    pub async fn edit_form(&self, caller: UserId, id: Uuid) -> Result<EditForm> {
        let recipe = self.find(id).await?;
        if recipe.user_id != caller {
            return Err(Error::Forbidden(id));
        }
        Ok(EditForm {
            ingredients: self.ingredients(id).await?,
            steps: self.steps(id).await?,
            categories: self.categories().await?,
            recipe,
        })
    }

    /// Overwrite a recipe's fields and replace all of its ingredients and steps.
    ///
    /// Ownership is checked inside the same transaction as the writes.
    pub async fn update(&self, caller: UserId, id: Uuid, draft: &RecipeDraft) -> Result<()> {
        draft.validate()?;
        let mut tx = self.pool.begin().await?;
        let outcome = rewrite_recipe(&mut tx, id, caller, draft).await;
        settle(tx, outcome, "update", id).await?;
        debug!(recipe = %id, user = %caller, "recipe updated");
        Ok(())
    }

    /// Delete a recipe together with its ingredients, steps and reviews.
    pub async fn delete(&self, caller: UserId, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let outcome = delete_recipe(&mut tx, id, caller).await;
        settle(tx, outcome, "delete", id).await?;
        debug!(recipe = %id, user = %caller, "recipe deleted");
        Ok(())
    }
}

/// Commit on success, roll back and hand the error back otherwise.
///
/// A failed rollback is logged; the caller still gets the error that caused it.
async fn settle<T>(tx: Transaction<'_, Sqlite>, outcome: Result<T>, action: &str, id: Uuid) -> Result<T> {
    match outcome {
        Ok(value) => match tx.commit().await {
            Ok(()) => Ok(value),
            Err(e) => {
                debug!(recipe = %id, error = %e, "recipe {action} failed to commit");
                Err(e.into())
            }
        },
        Err(e) => {
            debug!(recipe = %id, error = %e, "recipe {action} failed, rolling back");
            if let Err(rollback) = tx.rollback().await {
                debug!(recipe = %id, error = %rollback, "rollback of recipe {action} failed");
            }
            Err(e)
        }
    }
}

async fn insert_recipe(conn: &mut SqliteConnection, id: Uuid, caller: UserId, draft: &RecipeDraft) -> Result<()> {
    ensure_category(conn, draft.category_id).await?;
    sqlx::query(
        "INSERT INTO recipes (id, title, title_folded, description, image, views, category_id, user_id, created_at) \
         VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)",
    )
    .bind(id)
    .bind(draft.title.trim())
    .bind(fold_title(&draft.title))
    .bind(draft.description.trim())
    .bind(draft.image.as_str())
    .bind(draft.category_id)
    .bind(caller)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    replace_children(conn, id, &draft.ingredients, &draft.steps).await
}

async fn rewrite_recipe(conn: &mut SqliteConnection, id: Uuid, caller: UserId, draft: &RecipeDraft) -> Result<()> {
    ensure_owner(conn, id, caller).await?;
    ensure_category(conn, draft.category_id).await?;
    sqlx::query(
        "UPDATE recipes SET title = ?, title_folded = ?, description = ?, image = ?, category_id = ? WHERE id = ?",
    )
    .bind(draft.title.trim())
    .bind(fold_title(&draft.title))
    .bind(draft.description.trim())
    .bind(draft.image.as_str())
    .bind(draft.category_id)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    replace_children(conn, id, &draft.ingredients, &draft.steps).await
}

async fn delete_recipe(conn: &mut SqliteConnection, id: Uuid, caller: UserId) -> Result<()> {
    ensure_owner(conn, id, caller).await?;
    for sql in [
        "DELETE FROM reviews WHERE recipe_id = ?",
        "DELETE FROM steps WHERE recipe_id = ?",
        "DELETE FROM ingredients WHERE recipe_id = ?",
        "DELETE FROM recipes WHERE id = ?",
    ] {
        sqlx::query(sql).bind(id).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Replaces every ingredient and step of the recipe with the submitted ones.
///
/// Step numbers are the 1-based positions in `steps`.
async fn replace_children(
    conn: &mut SqliteConnection,
    id: Uuid,
    ingredients: &[Ingredient],
    steps: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM steps WHERE recipe_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if !ingredients.is_empty() {
        let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO ingredients (recipe_id, name, quantity) ");
        query.push_values(ingredients, |mut row, ingredient| {
            row.push_bind(id)
                .push_bind(ingredient.name.trim().to_owned())
                .push_bind(ingredient.quantity.trim().to_owned());
        });
        query.build().execute(&mut *conn).await?;
    }
    if !steps.is_empty() {
        let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO steps (recipe_id, step_number, description) ");
        query.push_values(steps.iter().zip(1_i64..), |mut row, (description, number)| {
            row.push_bind(id)
                .push_bind(number)
                .push_bind(description.trim().to_owned());
        });
        query.build().execute(&mut *conn).await?;
    }
    Ok(())
}

async fn ensure_owner(conn: &mut SqliteConnection, id: Uuid, caller: UserId) -> Result<()> {
    let owner = sqlx::query_scalar::<_, UserId>("SELECT user_id FROM recipes WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(Error::NotFound(id))?;
    if owner != caller {
        return Err(Error::Forbidden(id));
    }
    Ok(())
}

async fn ensure_category(conn: &mut SqliteConnection, category: CategoryId) -> Result<()> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ?")
        .bind(category)
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(Error::UnknownCategory(category));
    }
    Ok(())
}
