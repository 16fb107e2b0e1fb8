use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppError, AppResult, AppState, Payload};

use super::{Identity, IdentityError};

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(identity): State<Identity>,
    Payload(LoginRequest { email, password }): Payload<LoginRequest>,
) -> AppResult<Json<Value>> {
    match identity.sign_in(&email, &password).await {
        Ok(session) => {
            let uid = session.get("localId").and_then(Value::as_str).unwrap_or_default();
            tracing::info!(%uid, "signed in");
            Ok(Json(session))
        }
        Err(IdentityError::Rejected(reason)) => {
            tracing::debug!(%reason, "sign-in refused");
            Err(AppError::InvalidCredentials)
        }
        Err(err) => Err(err.into()),
    }
}
