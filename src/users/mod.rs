mod handlers;
mod model;
mod store;

use axum::{routing::get, Router};

use crate::AppState;

pub use model::{ProfileFields, UserProfile};
pub use store::ProfileStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search).post(handlers::register))
        .route("/{user_id}", get(handlers::profile).put(handlers::update))
}
