use recipebox_store::ReviewDraft;
use salvo::flash::FlashDepotExt;
use salvo::prelude::*;

use super::form;
use super::{require_user, store};
use crate::AppError;

#[handler]
pub(crate) async fn add_review(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let id = form::recipe_id(req)?;
    let reviewer = require_user(depot)?;
    let draft = req
        .parse_body::<ReviewDraft>()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    store(depot)?.add_review(reviewer, id, &draft).await?;
    depot.outgoing_flash_mut().success("Thanks for your review.");
    res.render(Redirect::other(format!("/recipes/{id}")));
    Ok(())
}
