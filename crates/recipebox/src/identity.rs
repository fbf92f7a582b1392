//! The signed-in user of a request.
//!
//! Authentication itself lives elsewhere; it leaves the user id in the session
//! under [`SESSION_USER_KEY`]. [`SessionIdentity`] copies that id into the
//! depot, where handlers read it through [`IdentityDepotExt`].

use recipebox_store::UserId;
use salvo::async_trait;
use salvo::prelude::*;
use salvo::session::SessionDepotExt;

/// Key used to store the current user id in the depot.
pub const CURRENT_USER_KEY: &str = "::recipebox::current_user";
/// Session entry holding the signed-in user id.
pub const SESSION_USER_KEY: &str = "user_id";

/// Extension trait for reading and setting the current user in a [`Depot`].
pub trait IdentityDepotExt {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;
    /// Mark `user` as signed in for the rest of the request.
    fn set_current_user(&mut self, user: UserId) -> &mut Self;
}

impl IdentityDepotExt for Depot {
    #[inline]
    fn current_user(&self) -> Option<UserId> {
        self.get::<UserId>(CURRENT_USER_KEY).ok().copied()
    }

    #[inline]
    fn set_current_user(&mut self, user: UserId) -> &mut Self {
        self.insert(CURRENT_USER_KEY, user)
    }
}

/// Middleware resolving the current user from the session.
///
/// Must be installed after the session handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionIdentity;

#[async_trait]
impl Handler for SessionIdentity {
    async fn handle(&self, _req: &mut Request, depot: &mut Depot, _res: &mut Response, _ctrl: &mut FlowCtrl) {
        let user = depot
            .session()
            .and_then(|session| session.get::<i64>(SESSION_USER_KEY));
        if let Some(id) = user {
            depot.set_current_user(UserId(id));
        }
    }
}
