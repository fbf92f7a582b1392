use recipebox_store::RecipeStore;

/// Shared state injected into every request.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Recipe storage.
    pub store: RecipeStore,
    /// Image url stored on newly created recipes.
    pub placeholder_image: String,
}

impl AppState {
    /// Bundle a store with the image used for new recipes.
    pub fn new(store: RecipeStore, placeholder_image: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_image: placeholder_image.into(),
        }
    }
}
