//! Recipe storage for recipebox.
//!
//! [`RecipeStore`] wraps a SQLite pool and implements the queries behind the
//! site:
//!
//! - the filtered, paginated listing with average review ratings ([`RecipeStore::list`]),
//! - the home feed of newest and most viewed recipes ([`RecipeStore::home_feed`]),
//! - the detail view, which counts one view per call ([`RecipeStore::detail`]),
//! - transactional create, update and delete of a recipe with its ingredients and steps,
//! - reviews, at most one per user and recipe.
//!
//! Every write takes the caller's [`UserId`] explicitly. Updates and deletes
//! are refused with [`Error::Forbidden`] unless the caller owns the recipe.
//!
//! # Example
//!
//! ```no_run
//! use recipebox_store::{CategoryId, Ingredient, RecipeDraft, RecipeFilter, RecipeStore};
//!
//! # async fn run() -> recipebox_store::Result<()> {
//! let store = RecipeStore::connect("sqlite://recipebox.db", 5).await?;
//! let chef = store.create_user("chef").await?;
//! let id = store
//!     .create(
//!         chef,
//!         &RecipeDraft {
//!             title: "Pasta".into(),
//!             description: "Weeknight pasta".into(),
//!             category_id: CategoryId(2),
//!             image: "https://placehold.jp/300x200.png".into(),
//!             ingredients: vec![Ingredient {
//!                 name: "flour".into(),
//!                 quantity: "200g".into(),
//!             }],
//!             steps: vec!["boil water".into(), "add pasta".into(), "drain".into()],
//!         },
//!     )
//!     .await?;
//! let detail = store.detail(id, Some(chef)).await?;
//! assert_eq!(detail.steps.len(), 3);
//!
//! let page = store.list(&RecipeFilter::new().title("pasta"), 1).await?;
//! assert_eq!(page.total, 1);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod filter;
pub mod model;
pub mod schema;
mod store;

pub use error::{Error, Result};
pub use filter::{PER_PAGE, RecipeFilter};
pub use model::{
    Category, CategoryId, EditForm, HomeFeed, Ingredient, Page, Recipe, RecipeCard, RecipeDetail, RecipeDraft,
    RecipeSummary, Review, ReviewDraft, Step, UserId,
};
pub use store::{LATEST_LIMIT, POPULAR_LIMIT, RecipeStore};
