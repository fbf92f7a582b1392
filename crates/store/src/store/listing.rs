use sqlx::{QueryBuilder, Sqlite};

use super::RecipeStore;
use crate::Result;
use crate::filter::{PER_PAGE, RecipeFilter};
use crate::model::{HomeFeed, Page, RecipeCard, RecipeSummary};

/// Number of recipes in the "latest" part of the home feed.
pub const LATEST_LIMIT: i64 = 3;
/// Number of recipes in the "popular" part of the home feed.
pub const POPULAR_LIMIT: i64 = 2;

const SUMMARY_SELECT: &str = "SELECT recipes.id, recipes.title, recipes.description, recipes.created_at, \
     recipes.image, users.name AS owner_name, AVG(reviews.rating) AS rating \
     FROM recipes \
     INNER JOIN users ON users.id = recipes.user_id \
     LEFT JOIN reviews ON reviews.recipe_id = recipes.id";

const CARD_SELECT: &str = "SELECT recipes.id, recipes.title, recipes.description, recipes.created_at, \
     recipes.image, users.name AS owner_name \
     FROM recipes \
     INNER JOIN users ON users.id = recipes.user_id";

impl RecipeStore {
    /// One page of recipes matching `filter`, with owner names and average ratings.
    ///
    /// Pages are numbered from 1; lower numbers are treated as 1.
    pub async fn list(&self, filter: &RecipeFilter, page: i64) -> Result<Page<RecipeSummary>> {
        let page = page.max(1);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM (");
        count.push(SUMMARY_SELECT);
        filter.push_conditions(&mut count);
        count.push(")");
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
        filter.push_conditions(&mut query);
        filter.push_ordering(&mut query);
        query
            .push(" LIMIT ")
            .push_bind(PER_PAGE)
            .push(" OFFSET ")
            .push_bind((page - 1).saturating_mul(PER_PAGE));
        let items = query.build_query_as::<RecipeSummary>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total, PER_PAGE, page))
    }

    /// Newest recipes and most viewed recipes.
    pub async fn home_feed(&self) -> Result<HomeFeed> {
        let latest = sqlx::query_as::<_, RecipeCard>(&format!(
            "{CARD_SELECT} ORDER BY recipes.created_at DESC LIMIT ?"
        ))
        .bind(LATEST_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        let popular = sqlx::query_as::<_, RecipeCard>(&format!("{CARD_SELECT} ORDER BY recipes.views DESC LIMIT ?"))
            .bind(POPULAR_LIMIT)
            .fetch_all(&self.pool)
            .await?;
        Ok(HomeFeed { latest, popular })
    }
}
