use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use session_cell::extractor::require_session;
use session_cell::services::session::SessionService;

use crate::handlers;
use crate::services::checkout::CheckoutService;

pub fn checkout_routes(
    checkout: Arc<CheckoutService>,
    sessions: Arc<SessionService>,
) -> Router {
    // Browsing the cart and coupons needs no session
    let public_routes = Router::new()
        .route("/order", post(handlers::create_order).get(handlers::get_order))
        .route("/coupons", get(handlers::list_coupons))
        .route("/coupon", post(handlers::apply_coupon).delete(handlers::remove_coupon));

    // Paying requires a logged-in session
    let protected_routes = Router::new()
        .route("/pay", post(handlers::pay))
        .layer(middleware::from_fn_with_state(sessions, require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(checkout)
}

pub fn appointments_routes(
    checkout: Arc<CheckoutService>,
    sessions: Arc<SessionService>,
) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .layer(middleware::from_fn_with_state(sessions, require_session))
        .with_state(checkout)
}
