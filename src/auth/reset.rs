use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AppError, AppResult, AppState, Payload};

use super::{Identity, IdentityError};

#[derive(Deserialize)]
pub(crate) struct ResetPasswordRequest {
    email: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn reset_password(
    State(identity): State<Identity>,
    Payload(ResetPasswordRequest { email }): Payload<ResetPasswordRequest>,
) -> AppResult<Json<Value>> {
    match identity.send_password_reset(&email).await {
        Ok(()) => Ok(Json(json!({ "message": "Password reset email sent" }))),
        Err(IdentityError::Rejected(reason)) => {
            tracing::debug!(%reason, "password reset refused");
            Err(AppError::Validation("Failed to send reset link".to_owned()))
        }
        Err(err) => Err(err.into()),
    }
}
