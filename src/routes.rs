use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::{
    auth::{self, Identity},
    error::AppError,
    state::AppState,
    suggest::{self, Suggestions},
    users::NewUser,
};

pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .ok_or(AppError::InvalidCredentials)?;
    if user.password != password {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&state, &user.id.to_string(), &user.email)?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub plan: Option<String>,
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Registration>,
) -> Result<Json<Value>, AppError> {
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;

    let user = state
        .users
        .create(NewUser {
            email,
            password,
            full_name: body.full_name,
            plan: body.plan,
        })
        .await?;

    info!("Registered {}", user.email);

    let token = issue_token(&state, &user.id.to_string(), &user.email)?;

    Ok(Json(json!({
        "message": "Registration successful",
        "token": token,
    })))
}

pub async fn profile_fetch_handler(
    identity: Identity,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let profile = state
        .profiles
        .get(&identity.subject_id)
        .await
        .ok_or(AppError::ProfileNotFound)?;

    Ok(Json(Value::Object(profile)))
}

pub async fn profile_save_handler(
    identity: Identity,
    State(state): State<Arc<AppState>>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let profile = state.profiles.put(&identity.subject_id, fields).await;

    Ok(Json(json!({
        "message": "Profile saved successfully",
        "profile": profile,
    })))
}

pub async fn profile_merge_handler(
    identity: Identity,
    State(state): State<Arc<AppState>>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let profile = state
        .profiles
        .merge(&identity.subject_id, fields)
        .await
        .ok_or(AppError::ProfileNotFound)?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}

pub async fn suggestions_handler(
    identity: Identity,
    State(state): State<Arc<AppState>>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<Suggestions>, AppError> {
    info!("Generating suggestions for {}", identity.subject_id);

    let suggestions = suggest::generate(
        state.generator.as_ref(),
        &body,
        state.config.max_output_tokens,
    )
    .await
    .map_err(|e| AppError::generation(e, state.config.expose_provider_errors))?;

    Ok(Json(suggestions))
}

fn require(field: Option<String>, name: &'static str) -> Result<String, AppError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or(AppError::MissingField(name))
}

fn issue_token(state: &AppState, subject_id: &str, email: &str) -> Result<String, AppError> {
    auth::issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_secs,
        subject_id,
        email,
    )
    .map_err(|e| AppError::Internal(e.into()))
}
