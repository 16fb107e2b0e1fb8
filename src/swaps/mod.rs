mod handlers;
mod model;
mod store;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::AppState;

pub use model::{Direction, Resolution, Swap, SwapForm, SwapRecord, SwapStatus};
pub use store::{StatusChange, SwapStore};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::request_swap))
        .route("/sent/{user_id}", get(handlers::sent))
        .route("/received/{user_id}", get(handlers::received))
        .route("/{swap_id}/status/{status}", put(handlers::update_status))
        .route("/{swap_id}", delete(handlers::delete_swap))
}
