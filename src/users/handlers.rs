use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{auth::Principal, AppError, AppResult, AppState, Params, Payload, Segments};

use super::{ProfileFields, ProfileStore, UserProfile};

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    skill: Option<String>,
    availability: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    principal: Principal,
    State(profiles): State<ProfileStore>,
    Payload(fields): Payload<ProfileFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    fields.validate()?;

    let user_id = profiles.create(fields).await?;
    tracing::info!(uid = %principal.uid, %user_id, "registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "user_id": user_id })),
    ))
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    Segments(user_id): Segments<String>,
    State(profiles): State<ProfileStore>,
) -> AppResult<Json<UserProfile>> {
    let Some(profile) = profiles.get(&user_id).await? else {
        return Err(AppError::NotFound("User"));
    };

    Ok(Json(profile))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    principal: Principal,
    Segments(user_id): Segments<String>,
    State(profiles): State<ProfileStore>,
    Payload(fields): Payload<ProfileFields>,
) -> AppResult<Json<Value>> {
    fields.validate()?;

    if !profiles.update(&user_id, fields).await? {
        return Err(AppError::NotFound("User"));
    }
    tracing::debug!(uid = %principal.uid, %user_id, "profile edited");

    Ok(Json(json!({ "message": "Profile updated" })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn search(
    State(profiles): State<ProfileStore>,
    Params(SearchQuery { skill, availability }): Params<SearchQuery>,
) -> AppResult<Json<Value>> {
    // `?skill=` with nothing after it means no filter
    let skill = skill.as_deref().filter(|s| !s.is_empty());
    let availability = availability.as_deref().filter(|s| !s.is_empty());

    let results = profiles.search(skill, availability).await?;
    Ok(Json(json!({ "results": results })))
}
