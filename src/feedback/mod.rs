mod handlers;
mod model;
mod store;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use model::{mean_rating, Feedback, FeedbackForm, MAX_RATING, MIN_RATING};
pub use store::FeedbackStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::leave_feedback))
        .route("/user/{user_id}", get(handlers::feedback_for_user))
}
