use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{auth::Principal, AppError, AppResult, AppState, Payload, Segments};

use super::{Direction, Resolution, StatusChange, SwapForm, SwapStore};

#[debug_handler(state = AppState)]
pub(crate) async fn request_swap(
    principal: Principal,
    State(swaps): State<SwapStore>,
    Payload(form): Payload<SwapForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    form.validate()?;

    let swap_id = swaps.create(form).await?;
    tracing::debug!(uid = %principal.uid, %swap_id, "swap requested");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Swap request created", "swap_id": swap_id })),
    ))
}

#[debug_handler(state = AppState)]
pub(crate) async fn sent(
    Segments(user_id): Segments<String>,
    State(swaps): State<SwapStore>,
) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "swaps": swaps.list(&user_id, Direction::Sent).await? })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn received(
    Segments(user_id): Segments<String>,
    State(swaps): State<SwapStore>,
) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "swaps": swaps.list(&user_id, Direction::Received).await? })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_status(
    principal: Principal,
    Segments((swap_id, status)): Segments<(String, String)>,
    State(swaps): State<SwapStore>,
) -> AppResult<Json<Value>> {
    let resolution: Resolution = status.parse()?;

    match swaps.update_status(&swap_id, resolution).await? {
        StatusChange::Applied => {
            tracing::debug!(uid = %principal.uid, %swap_id, %status, "status changed");
            Ok(Json(json!({ "message": format!("Swap {status}") })))
        }
        StatusChange::Missing => Err(AppError::NotFound("Swap")),
        StatusChange::AlreadyResolved(current) => {
            Err(format!("Swap is already {current}").into())
        }
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_swap(
    principal: Principal,
    Segments(swap_id): Segments<String>,
    State(swaps): State<SwapStore>,
) -> AppResult<Json<Value>> {
    if !swaps.delete(&swap_id).await? {
        return Err(AppError::NotFound("Swap"));
    }
    tracing::debug!(uid = %principal.uid, %swap_id, "swap removed");

    Ok(Json(json!({ "message": "Swap request deleted" })))
}
