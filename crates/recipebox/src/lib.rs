//! Recipebox web server.
//!
//! Serves the recipe listing, detail pages and the create, edit and delete
//! flows on top of [`recipebox_store`]. Reads answer with JSON documents,
//! writes redirect with `303 See Other` and leave a flash message behind.
//!
//! The caller is read from the signed session cookie by [`SessionIdentity`];
//! signing in is handled by another service that writes the user id into the
//! session.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
mod error;
mod handlers;
pub mod identity;
mod routing;
mod state;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use identity::{IdentityDepotExt, SessionIdentity};
pub use routing::{router, service};
pub use state::AppState;
