//! Request handlers. Reads render JSON documents, writes answer with a
//! `303 See Other` redirect and leave a flash message for the next page.

mod form;
mod recipe;
mod review;

pub(crate) use recipe::{create, create_form, destroy, edit, home, index, show, update};
pub(crate) use review::add_review;

use recipebox_store::{RecipeStore, UserId};
use salvo::flash::FlashDepotExt;
use salvo::prelude::*;
use serde::Serialize;

use crate::identity::IdentityDepotExt;
use crate::{AppError, AppState};

/// A flash message carried over from the previous request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Notice {
    level: String,
    message: String,
}

fn state(depot: &Depot) -> Result<&AppState, AppError> {
    depot.obtain::<AppState>().map_err(|_| AppError::MissingState)
}

fn store(depot: &Depot) -> Result<RecipeStore, AppError> {
    state(depot).map(|state| state.store.clone())
}

fn require_user(depot: &Depot) -> Result<UserId, AppError> {
    depot.current_user().ok_or(AppError::Unauthorized)
}

fn notices(depot: &mut Depot) -> Vec<Notice> {
    depot
        .incoming_flash()
        .map(|flash| {
            flash
                .iter()
                .map(|message| Notice {
                    level: message.level.to_string(),
                    message: message.value.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}
