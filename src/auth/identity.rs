use serde::Serialize;
use serde_json::Value;

use crate::GetField;

use super::Principal;

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("authorization value is not a bearer token")]
    NotBearer,

    #[error("identity provider refused: {0}")]
    Rejected(String),

    #[error("identity provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("unexpected identity provider response: {0}")]
    Malformed(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordSignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

/// Client for the Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct Identity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Identity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    /// Check an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// Nothing is cached; each call asks the provider.
    pub async fn verify(&self, authorization: &str) -> Result<Principal, IdentityError> {
        let token = authorization
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityError::NotBearer)?;

        let body = self.call("lookup", &LookupRequest { id_token: token }).await?;
        let user = body
            .get_obj_field("users")
            .map_err(IdentityError::Malformed)?
            .get(0)
            .ok_or_else(|| IdentityError::Malformed("empty users in lookup response".to_owned()))?;

        Principal::from_claims(user.clone())
    }

    /// Password sign-in. Returns the provider payload (`idToken`, `refreshToken`, ...).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Value, IdentityError> {
        self.call(
            "signInWithPassword",
            &PasswordSignInRequest {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        self.call(
            "sendOobCode",
            &OobCodeRequest {
                request_type: "PASSWORD_RESET",
                email,
            },
        )
        .await?;

        Ok(())
    }

    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<Value, IdentityError> {
        let url = format!("{}/accounts:{method}?key={}", self.base_url, self.api_key);
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // provider errors look like {"error": {"code": 400, "message": "INVALID_ID_TOKEN"}}
            let reason = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get_obj_field("error").ok()?.get_str_field("message").ok())
                .unwrap_or_else(|| status.to_string());
            return Err(IdentityError::Rejected(reason));
        }

        serde_json::from_str(&text).map_err(|err| IdentityError::Malformed(err.to_string()))
    }
}
