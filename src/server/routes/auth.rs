use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Form, Json};
use serde::{Deserialize, Serialize};

use crate::core::AppState;
use crate::db::Admin;
use crate::error::{Error, Result};

/// OAuth2 password-flow form; extra fields such as `grant_type` are ignored
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /token: exchange credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let admin = state
        .admins
        .verify_credentials(&form.username, &form.password)
        .await?
        .ok_or_else(|| Error::Unauthenticated("Incorrect username or password".into()))?;

    let access_token = state.tokens.issue_token(&admin.username)?;
    tracing::info!("Issued access token for {}", admin.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /me: the admin the bearer token resolves to
pub async fn me(Extension(admin): Extension<Admin>) -> Json<Admin> {
    Json(admin)
}
