use salvo::affix_state;
use salvo::flash::CookieStore as FlashCookieStore;
use salvo::logging::Logger;
use salvo::prelude::*;
use salvo::session::{CookieStore as SessionCookieStore, SessionHandler};

use crate::identity::SessionIdentity;
use crate::{AppState, Config, handlers};

/// Routes of the site, with state injection and flash messages.
///
/// No caller is resolved here; [`service`] adds the session layer in front.
pub fn router(state: AppState) -> Router {
    Router::new()
        .hoop(Logger::new())
        .hoop(affix_state::inject(state))
        .hoop(FlashCookieStore::new().into_handler())
        .get(handlers::home)
        .push(
            Router::with_path("recipes")
                .get(handlers::index)
                .post(handlers::create)
                .push(Router::with_path("create").get(handlers::create_form))
                .push(
                    Router::with_path("{id}")
                        .get(handlers::show)
                        .put(handlers::update)
                        .patch(handlers::update)
                        .delete(handlers::destroy)
                        .push(Router::with_path("edit").get(handlers::edit))
                        .push(Router::with_path("reviews").post(handlers::add_review)),
                ),
        )
}

/// The full service: cookie sessions, caller identity and [`router`].
pub fn service(config: &Config, state: AppState) -> Result<Service, salvo::Error> {
    let session = SessionHandler::builder(SessionCookieStore::new(), &config.session_secret).build()?;
    let router = Router::new()
        .hoop(session)
        .hoop(SessionIdentity)
        .push(router(state));
    Ok(Service::new(router))
}
