use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::contexts::BookingContexts;

pub fn booking_routes(contexts: Arc<BookingContexts>) -> Router {
    Router::new()
        .route("/{doctor_id}", get(handlers::get_context))
        .route("/{doctor_id}/toggle", post(handlers::toggle_context))
        .route("/{doctor_id}/collapse", post(handlers::collapse_context))
        .route("/{doctor_id}/plan", post(handlers::select_plan))
        .route("/{doctor_id}/date", post(handlers::select_date))
        .route("/{doctor_id}/time", post(handlers::select_time))
        .route("/{doctor_id}/pricing", get(handlers::get_pricing))
        .route("/{doctor_id}/confirm", post(handlers::confirm_booking))
        .with_state(contexts)
}
