use sqlx::FromRow;
use uuid::Uuid;

use super::RecipeStore;
use crate::model::{Recipe, RecipeDetail, Review, UserId};
use crate::{Error, Result};

#[derive(FromRow)]
struct RecipeWithOwner {
    #[sqlx(flatten)]
    recipe: Recipe,
    owner_name: String,
}

impl RecipeStore {
    /// Everything the detail page needs about a recipe, seen by `viewer`.
    ///
    /// Every successful call counts as one view, whoever the viewer is. The
    /// returned `views` is the count before this view.
    pub async fn detail(&self, id: Uuid, viewer: Option<UserId>) -> Result<RecipeDetail> {
        let RecipeWithOwner { recipe, owner_name } = sqlx::query_as::<_, RecipeWithOwner>(
            "SELECT recipes.id, recipes.title, recipes.description, recipes.image, recipes.views, \
             recipes.category_id, recipes.user_id, recipes.created_at, users.name AS owner_name \
             FROM recipes INNER JOIN users ON users.id = recipes.user_id \
             WHERE recipes.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound(id))?;

        let ingredients = self.ingredients(id).await?;
        let steps = self.steps(id).await?;
        let reviews = self.reviews(id).await?;
        self.increment_views(id).await?;

        let is_owner = viewer == Some(recipe.user_id);
        let has_reviewed = viewer.is_some_and(|viewer| reviews.iter().any(|review| review.user_id == viewer));
        Ok(RecipeDetail {
            rating: average(&reviews),
            recipe,
            owner_name,
            ingredients,
            steps,
            reviews,
            is_owner,
            has_reviewed,
        })
    }

    /// Add one to the view counter of a recipe.
    pub async fn increment_views(&self, id: Uuid) -> Result<()> {
        let updated = sqlx::query("UPDATE recipes SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Reviews of a recipe, oldest first.
    pub async fn reviews(&self, id: Uuid) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT reviews.user_id, users.name AS reviewer_name, reviews.rating, reviews.comment, \
             reviews.created_at \
             FROM reviews INNER JOIN users ON users.id = reviews.user_id \
             WHERE reviews.recipe_id = ? ORDER BY reviews.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }
}

fn average(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|review| review.rating).sum();
    Some(sum as f64 / reviews.len() as f64)
}
