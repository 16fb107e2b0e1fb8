mod registry;

use axum::{debug_handler, extract::State, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AppResult, AppState, Params};

pub use registry::SkillRegistry;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggest", get(suggest))
}

#[derive(Deserialize)]
pub(crate) struct SuggestQuery {
    q: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn suggest(
    State(skills): State<SkillRegistry>,
    Params(SuggestQuery { q }): Params<SuggestQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "suggestions": skills.suggest(&q).await? })))
}
