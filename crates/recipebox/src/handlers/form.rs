//! Request inputs: the listing query string and submitted recipe bodies.

use recipebox_store::{CategoryId, Ingredient, RecipeDraft, RecipeFilter};
use salvo::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppError;

/// Query keys carrying category ids. Browsers send `categories[]` for
/// multi-select checkboxes.
const CATEGORY_KEYS: [&str; 2] = ["categories[]", "categories"];

/// Recipe id from the `{id}` route segment. Malformed ids name no recipe.
pub(crate) fn recipe_id(req: &Request) -> Result<Uuid, AppError> {
    req.param::<String>("id")
        .and_then(|id| Uuid::parse_str(&id).ok())
        .ok_or(AppError::NotFound)
}

/// Listing filter and page number from the query string.
///
/// Empty values are ignored. Unparsable category ids or ratings are rejected;
/// an unparsable page falls back to the first page.
pub(crate) fn listing_query(req: &Request) -> Result<(RecipeFilter, i64), AppError> {
    let queries = req.queries();
    let mut categories = Vec::new();
    for key in CATEGORY_KEYS {
        for value in queries.get_vec(key).into_iter().flatten() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let id = value
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("invalid category `{value}`")))?;
            categories.push(CategoryId(id));
        }
    }

    let mut filter = RecipeFilter::new().categories(categories);
    if let Some(rating) = non_empty(queries.get("rating")) {
        let rating = rating
            .parse::<f64>()
            .map_err(|_| AppError::BadRequest(format!("invalid rating `{rating}`")))?;
        filter = filter.min_rating(rating);
    }
    if let Some(title) = non_empty(queries.get("title")) {
        filter = filter.title(title);
    }

    let page = non_empty(queries.get("page"))
        .and_then(|page| page.parse::<i64>().ok())
        .unwrap_or(1);
    Ok((filter, page))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Body of a create or update request.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RecipeForm {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(alias = "category")]
    pub(crate) category_id: CategoryId,
    #[serde(default)]
    pub(crate) ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub(crate) steps: Vec<String>,
}

impl RecipeForm {
    /// Parse a JSON body.
    pub(crate) async fn parse(req: &mut Request) -> Result<Self, AppError> {
        req.parse_body::<Self>()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }

    /// Turn the submission into a draft carrying `image`.
    pub(crate) fn into_draft(self, image: String) -> RecipeDraft {
        RecipeDraft {
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            image,
            ingredients: self.ingredients,
            steps: self.steps,
        }
    }
}
