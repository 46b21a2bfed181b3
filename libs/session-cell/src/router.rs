use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::session::SessionService;

pub fn session_routes(sessions: Arc<SessionService>) -> Router {
    Router::new()
        .route("/login", post(handlers::start_login))
        .route("/verify", post(handlers::verify))
        .route("/resend", post(handlers::resend))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .with_state(sessions)
}
