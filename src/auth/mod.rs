use axum::{routing::post, Router};

use crate::AppState;

mod identity;
mod login;
mod principal;
mod reset;

pub use identity::{Identity, IdentityError, DEFAULT_IDENTITY_URL};
pub use principal::Principal;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/reset-password", post(reset::reset_password))
}
