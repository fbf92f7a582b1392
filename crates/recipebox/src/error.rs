use recipebox_store::Error as StoreError;
use salvo::async_trait;
use salvo::http::StatusError;
use salvo::prelude::*;
use thiserror::Error;

/// Error returned by request handlers.
///
/// Rendered as a [`StatusError`]; database failures are logged and hidden
/// behind a generic 500.
#[derive(Debug, Error)]
pub enum AppError {
    /// The storage layer refused or failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The request needs a signed-in user.
    #[error("sign in required")]
    Unauthorized,
    /// The request could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The route parameter does not name a recipe.
    #[error("no such recipe")]
    NotFound,
    /// [`AppState`](crate::AppState) was not injected into the depot.
    #[error("application state is missing from the depot")]
    MissingState,
}

impl AppError {
    /// Status error rendered for this error.
    pub fn status(&self) -> StatusError {
        match self {
            Self::Store(StoreError::NotFound(_)) | Self::NotFound => StatusError::not_found(),
            Self::Store(StoreError::Forbidden(_)) => StatusError::forbidden().brief("You do not own this recipe."),
            Self::Store(e @ (StoreError::Invalid { .. } | StoreError::UnknownCategory(_))) => {
                StatusError::unprocessable_entity().brief(e.to_string())
            }
            Self::Store(StoreError::AlreadyReviewed(_)) => {
                StatusError::conflict().brief("You already reviewed this recipe.")
            }
            Self::Store(_) | Self::MissingState => StatusError::internal_server_error(),
            Self::Unauthorized => StatusError::unauthorized().brief("Sign in required."),
            Self::BadRequest(reason) => StatusError::bad_request().brief(reason.clone()),
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status();
        if status.code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, code = %status.code, "request rejected");
        }
        res.render(status);
    }
}
