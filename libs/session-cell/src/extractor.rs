use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;

use crate::services::session::SessionService;

/// Middleware guarding routes that need a logged-in session. The restored
/// user is added to request extensions for downstream handlers.
pub async fn require_session(
    State(sessions): State<Arc<SessionService>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = sessions
        .current_user()
        .ok_or_else(|| AppError::Auth("Login required".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
