use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::directory::DirectoryService;

pub fn catalog_routes(directory: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .route("/doctors/{doctor_id}/booking-options", get(handlers::get_booking_options))
        .route("/specialities", get(handlers::get_specialities))
        .route("/locations", get(handlers::get_locations))
        .route("/filters", get(handlers::get_filter_panel))
        .route("/filters/toggle", post(handlers::toggle_filter))
        .route("/filters/select", post(handlers::select_filter))
        .with_state(directory)
}
