use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde_json::Value;

use crate::{AppError, GetField};

use super::{Identity, IdentityError};

/// A verified caller.
///
/// Taking a `Principal` argument is what gates a handler: the extractor
/// verifies the `Authorization` header against the identity provider and
/// rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Principal {
    pub uid: String,
    pub email: Option<String>,
    pub claims: Value,
}

impl Principal {
    pub(crate) fn from_claims(claims: Value) -> Result<Self, IdentityError> {
        let uid = claims
            .get_str_field("localId")
            .map_err(IdentityError::Malformed)?;
        let email = claims.get_str_field("email").ok();

        Ok(Principal { uid, email, claims })
    }
}

impl<S> FromRequestParts<S> for Principal
where
    Identity: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(authorization) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(AppError::Unauthorized);
        };

        Identity::from_ref(state)
            .verify(authorization)
            .await
            .map_err(|err| {
                tracing::debug!("credential refused: {err}");
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn claims_need_local_id() {
        let principal =
            Principal::from_claims(json!({"localId": "u-1", "email": "a@b.c"})).unwrap();
        assert_eq!(principal.uid, "u-1");
        assert_eq!(principal.email.as_deref(), Some("a@b.c"));

        let anonymous = Principal::from_claims(json!({"localId": "u-2"})).unwrap();
        assert_eq!(anonymous.email, None);

        assert!(matches!(
            Principal::from_claims(json!({"email": "a@b.c"})),
            Err(IdentityError::Malformed(_))
        ));
    }
}
