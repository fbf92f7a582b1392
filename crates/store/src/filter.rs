//! Filters narrowing the recipe listing.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use crate::model::CategoryId;

/// Number of recipes on one listing page.
pub const PER_PAGE: i64 = 8;

/// Caller supplied constraints for [`RecipeStore::list`](crate::RecipeStore::list).
///
/// Every constraint is optional and they combine with `AND`. Empty values
/// (no categories, blank title, missing or non-positive rating) do not filter.
/// A minimum rating also switches the ordering from newest first to best rated first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeFilter {
    /// Only recipes in one of these categories.
    pub categories: Vec<CategoryId>,
    /// Only recipes whose average review rating is at least this value.
    pub rating: Option<f64>,
    /// Only recipes whose title contains this text, ignoring case.
    pub title: Option<String>,
}

impl RecipeFilter {
    /// Create a filter that matches every recipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given categories.
    #[must_use]
    pub fn categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Restrict to recipes rated at least `rating` on average.
    #[must_use]
    pub fn min_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Restrict to titles containing `title`.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Effective rating threshold.
    pub fn rating_threshold(&self) -> Option<f64> {
        self.rating.filter(|rating| rating.is_finite() && *rating > 0.0)
    }

    /// Effective title search term.
    pub fn title_term(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|term| !term.is_empty())
    }

    /// `LIKE` pattern matched against the folded title column.
    fn title_pattern(&self) -> Option<String> {
        self.title_term()
            .map(|term| format!("%{}%", escape_like(&fold_title(term))))
    }

    /// Appends the `WHERE`, `GROUP BY` and `HAVING` clauses.
    pub(crate) fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        let mut keyword = " WHERE ";
        if !self.categories.is_empty() {
            query.push(keyword).push("recipes.category_id IN (");
            let mut ids = query.separated(", ");
            for id in &self.categories {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
            keyword = " AND ";
        }
        if let Some(pattern) = self.title_pattern() {
            query
                .push(keyword)
                .push("recipes.title_folded LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }
        query.push(" GROUP BY recipes.id");
        if let Some(rating) = self.rating_threshold() {
            query.push(" HAVING AVG(reviews.rating) >= ").push_bind(rating);
        }
    }

    /// Appends the `ORDER BY` clause.
    pub(crate) fn push_ordering(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        if self.rating_threshold().is_some() {
            query.push(" ORDER BY rating DESC, recipes.created_at DESC");
        } else {
            query.push(" ORDER BY recipes.created_at DESC");
        }
    }
}

/// Case folding applied to stored titles and to search terms alike.
///
/// SQLite's `LIKE` only ignores case for ASCII letters.
pub(crate) fn fold_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
