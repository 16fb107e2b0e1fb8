use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{auth::Principal, AppError, AppResult, AppState, Payload, Segments};

use super::{FeedbackForm, FeedbackStore};

#[debug_handler(state = AppState)]
pub(crate) async fn leave_feedback(
    principal: Principal,
    State(feedback): State<FeedbackStore>,
    Payload(form): Payload<FeedbackForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    form.validate()?;

    if !feedback.submit(form).await? {
        return Err(AppError::NotFound("User"));
    }
    tracing::debug!(uid = %principal.uid, "feedback left");

    Ok((StatusCode::CREATED, Json(json!({ "message": "Feedback submitted" }))))
}

#[debug_handler(state = AppState)]
pub(crate) async fn feedback_for_user(
    Segments(user_id): Segments<String>,
    State(feedback): State<FeedbackStore>,
) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "feedback": feedback.list_for_user(&user_id).await? })))
}
