use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::authentication::models::AuthResult;
use crate::domain::authentication::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let Json(body) = payload?;
    let command = LoginCommand::new(body.username, body.password)?;

    state
        .authentication_service
        .authenticate(command)
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Issued token; `expiresAt` is in seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponseData {
    pub token: String,
    pub expires_at: i64,
}

impl From<&AuthResult> for SignInResponseData {
    fn from(result: &AuthResult) -> Self {
        Self {
            token: result.token.clone(),
            expires_at: result.expires_at.timestamp(),
        }
    }
}
