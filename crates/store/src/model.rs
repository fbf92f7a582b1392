//! Rows read from and drafts written to the recipe tables.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum length of a recipe title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Identifier of a user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Identifier of a recipe category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CategoryId(pub i64);

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A recipe row.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Recipe {
    /// Recipe id.
    pub id: Uuid,
    /// Title as submitted, trimmed.
    pub title: String,
    /// Free text description.
    pub description: String,
    /// Image url.
    pub image: String,
    /// Number of times the detail page was shown.
    pub views: i64,
    /// Category of the recipe.
    pub category_id: CategoryId,
    /// Owner, the user who created the recipe.
    pub user_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Recipe card shown on the home feed.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct RecipeCard {
    /// Recipe id.
    pub id: Uuid,
    /// Recipe title.
    pub title: String,
    /// Recipe description.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Image url.
    pub image: String,
    /// Name of the owner.
    pub owner_name: String,
}

/// Recipe entry of the filtered listing, with its average review rating.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct RecipeSummary {
    /// Recipe id.
    pub id: Uuid,
    /// Recipe title.
    pub title: String,
    /// Recipe description.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Image url.
    pub image: String,
    /// Name of the owner.
    pub owner_name: String,
    /// `None` when the recipe has no reviews yet.
    pub rating: Option<f64>,
}

/// An ingredient line of a recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    /// What to use, e.g. `flour`.
    pub name: String,
    /// How much of it, free text such as `200g`.
    pub quantity: String,
}

/// A numbered cooking step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct Step {
    /// 1-based position of the step.
    pub step_number: i64,
    /// What to do.
    pub description: String,
}

/// A review together with the reviewer's name.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Review {
    /// Author of the review.
    pub user_id: UserId,
    /// Name of the author.
    pub reviewer_name: String,
    /// Rating from 1 to 5.
    pub rating: i64,
    /// Optional comment.
    pub comment: Option<String>,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

/// A recipe category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

/// Latest and most viewed recipes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HomeFeed {
    /// Newest recipes first.
    pub latest: Vec<RecipeCard>,
    /// Most viewed recipes first.
    pub popular: Vec<RecipeCard>,
}

/// Everything the detail page shows about one recipe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeDetail {
    /// The recipe row.
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Name of the owner.
    pub owner_name: String,
    /// Average of all review ratings.
    pub rating: Option<f64>,
    /// Ingredients in submission order.
    pub ingredients: Vec<Ingredient>,
    /// Steps ordered by number.
    pub steps: Vec<Step>,
    /// Reviews, oldest first.
    pub reviews: Vec<Review>,
    /// The viewer owns the recipe.
    pub is_owner: bool,
    /// The viewer already reviewed the recipe.
    pub has_reviewed: bool,
}

/// Current data of a recipe, for its owner to edit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditForm {
    /// The recipe row.
    pub recipe: Recipe,
    /// Current ingredients.
    pub ingredients: Vec<Ingredient>,
    /// Current steps.
    pub steps: Vec<Step>,
    /// Every category, for the category picker.
    pub categories: Vec<Category>,
}

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    /// Entries on this page.
    pub items: Vec<T>,
    /// Number of matching entries across all pages.
    pub total: i64,
    /// Page size.
    pub per_page: i64,
    /// 1-based number of this page.
    pub current_page: i64,
    /// Number of the last page, at least 1.
    pub last_page: i64,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, total: i64, per_page: i64, current_page: i64) -> Self {
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            items,
            total,
            per_page,
            current_page,
            last_page,
        }
    }
}

/// Submitted recipe data, used both to create and to update a recipe.
///
/// Ingredients keep their submitted order and step numbers are assigned from
/// the position in `steps`, starting at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Title, 1 to 255 characters.
    pub title: String,
    /// Description, not blank.
    pub description: String,
    /// Existing category.
    pub category_id: CategoryId,
    /// Image url.
    pub image: String,
    /// At least one ingredient.
    pub ingredients: Vec<Ingredient>,
    /// Step descriptions in order, at least one.
    pub steps: Vec<String>,
}

impl RecipeDraft {
    /// Checks the required fields.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid("title", "must not be empty"));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::invalid("title", "must be at most 255 characters"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::invalid("description", "must not be empty"));
        }
        if self.ingredients.is_empty() {
            return Err(Error::invalid("ingredients", "at least one ingredient is required"));
        }
        for ingredient in &self.ingredients {
            if ingredient.name.trim().is_empty() {
                return Err(Error::invalid("ingredients", "ingredient name must not be empty"));
            }
            if ingredient.quantity.trim().is_empty() {
                return Err(Error::invalid("ingredients", "ingredient quantity must not be empty"));
            }
        }
        if self.steps.is_empty() {
            return Err(Error::invalid("steps", "at least one step is required"));
        }
        if self.steps.iter().any(|step| step.trim().is_empty()) {
            return Err(Error::invalid("steps", "step description must not be empty"));
        }
        Ok(())
    }
}

/// A rating with an optional comment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReviewDraft {
    /// Rating from 1 to 5.
    pub rating: i64,
    /// Optional comment; blank comments are stored as none.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewDraft {
    /// Checks that the rating is between 1 and 5.
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(Error::invalid("rating", "must be between 1 and 5"));
        }
        Ok(())
    }

    pub(crate) fn comment(&self) -> Option<&str> {
        self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
