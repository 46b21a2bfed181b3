use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::SessionError;
use crate::services::session::SessionService;

// ==============================================================================
// REQUEST STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct StartLoginRequest {
    pub contact: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

fn map_session_error(err: SessionError) -> AppError {
    match &err {
        SessionError::InvalidContact(_) => AppError::ValidationError(err.to_string()),
        SessionError::NoPendingLogin => AppError::BadRequest(err.to_string()),
        SessionError::InvalidCode => AppError::Auth(err.to_string()),
        SessionError::ResendCooldown { .. } => AppError::Conflict(err.to_string()),
        SessionError::Storage(msg) => AppError::Storage(msg.clone()),
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

pub async fn start_login(
    State(sessions): State<Arc<SessionService>>,
    Json(request): Json<StartLoginRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("Login requested");

    let challenge = sessions
        .start_login(&request.contact)
        .map_err(map_session_error)?;

    Ok(Json(json!({
        "challenge": challenge,
        "message": "Verification code sent"
    })))
}

pub async fn verify(
    State(sessions): State<Arc<SessionService>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<Value>, AppError> {
    let user = sessions.verify(&request.code).map_err(map_session_error)?;

    Ok(Json(json!({
        "user": user,
        "message": "Logged in"
    })))
}

pub async fn resend(
    State(sessions): State<Arc<SessionService>>,
) -> Result<Json<Value>, AppError> {
    let challenge = sessions.resend().map_err(map_session_error)?;

    Ok(Json(json!({
        "challenge": challenge,
        "message": "Verification code re-sent"
    })))
}

pub async fn logout(
    State(sessions): State<Arc<SessionService>>,
) -> Result<Json<Value>, AppError> {
    sessions.logout().map_err(map_session_error)?;
    Ok(Json(json!({ "message": "Logged out" })))
}

pub async fn me(State(sessions): State<Arc<SessionService>>) -> Json<Value> {
    match sessions.current_user() {
        Some(user) => {
            let initial = user.initial();
            Json(json!({
                "logged_in": true,
                "user": user,
                "initial": initial
            }))
        }
        None => Json(json!({ "logged_in": false })),
    }
}
