use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{auth::IdentityError, docs::DocError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Malformed payload, missing field, or an out-of-enum value.
    Validation(String),
    /// Missing, invalid or expired bearer credential.
    Unauthorized,
    /// Password sign-in refused by the identity provider.
    InvalidCredentials,
    NotFound(&'static str),
    /// Document store or identity provider failure. Never shown to the client.
    Upstream(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            Validation(_) => StatusCode::BAD_REQUEST,
            Unauthorized | InvalidCredentials => StatusCode::UNAUTHORIZED,
            NotFound(_) => StatusCode::NOT_FOUND,
            Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use AppError::*;
        let status = self.status();
        let detail = match self {
            Validation(msg) => msg,
            Unauthorized => "Invalid or expired token".to_owned(),
            InvalidCredentials => "Invalid credentials".to_owned(),
            NotFound(what) => format!("{what} not found"),
            Upstream(err) => {
                tracing::error!("internal error: {err:?}");
                "Internal Server Error".to_owned()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        Self::Validation(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        Self::Validation(msg.to_owned())
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Upstream(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(anyhow::Error);
apperr_impl!(DocError);
apperr_impl!(IdentityError);

macro_rules! rejection_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(rejection: $E) -> Self {
                Self::Validation(rejection.body_text())
            }
        }
    };
}

rejection_impl!(JsonRejection);
rejection_impl!(QueryRejection);
rejection_impl!(PathRejection);
