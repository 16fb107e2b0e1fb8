pub mod appresult;
pub mod auth;
pub mod config;
pub mod docs;
pub mod feedback;
pub mod skills;
pub mod swaps;
pub mod users;

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppError, AppResult};

use auth::Identity;
use docs::Docs;
use feedback::FeedbackStore;
use skills::SkillRegistry;
use swaps::SwapStore;
use users::ProfileStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub identity: Identity,
    pub profiles: ProfileStore,
    pub swaps: SwapStore,
    pub feedback: FeedbackStore,
    pub skills: SkillRegistry,
}

impl AppState {
    /// Wire every store to the same document store handle.
    pub fn new(docs: Docs, identity: Identity) -> Self {
        let skills = SkillRegistry::new(docs.clone());
        Self {
            identity,
            profiles: ProfileStore::new(docs.clone(), skills.clone()),
            swaps: SwapStore::new(docs.clone(), skills.clone()),
            feedback: FeedbackStore::new(docs),
            skills,
        }
    }
}

/// JSON body extractor whose rejections become `AppError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

/// Query string extractor whose rejections become `AppError::Validation`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Params<T>(pub T);

/// Path parameter extractor whose rejections become `AppError::Validation`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Segments<T>(pub T);

pub trait GetField {
    fn get_str_field(&self, field: &str) -> Result<String, String>;
    fn get_obj_field(&self, field: &str) -> Result<&Value, String>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> Result<String, String> {
        Ok(
            self.get(field)
            .ok_or(format!("expected {field} in {self}"))?
            .as_str()
            .ok_or(format!("expected {field} in {self} to be string"))?
            .to_owned()
        )
    }

    fn get_obj_field(&self, field: &str) -> Result<&Value, String> {
        self.get(field)
        .ok_or(format!("expected {field} in {self}"))
    }
}

pub fn app(state: AppState, cors_origins: &[String]) -> anyhow::Result<Router> {
    Ok(
        Router::new()
            .route("/", get(root))

            .nest("/auth", auth::router())
            .nest("/users", users::router())
            .nest("/swaps", swaps::router())
            .nest("/feedback", feedback::router())
            .nest("/skills", skills::router())

            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors(cors_origins)?)
    )
}

fn cors(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    )
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Skill Swap Backend is running." }))
}
