use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{CatalogError, DoctorSearchFilters, OpenFilter};
use crate::services::directory::DirectoryService;

// ==============================================================================
// QUERY/REQUEST STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub speciality: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleFilterRequest {
    pub filter: OpenFilter,
}

#[derive(Debug, Deserialize)]
pub struct SelectFilterRequest {
    pub speciality: Option<String>,
    pub location: Option<String>,
}

fn map_catalog_error(err: CatalogError) -> AppError {
    match &err {
        CatalogError::DoctorNotFound(id) => AppError::NotFound(format!("Doctor {} not found", id)),
        CatalogError::InvalidPlan { .. } => AppError::ValidationError(err.to_string()),
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

pub async fn list_doctors(
    State(directory): State<Arc<DirectoryService>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("Listing doctors");

    let filters = DoctorSearchFilters {
        speciality: query.speciality,
        location: query.location,
    };
    let doctors = directory
        .list_doctors(&filters)
        .await
        .map_err(map_catalog_error)?;
    let count = doctors.len();

    Ok(Json(json!({
        "doctors": doctors,
        "count": count
    })))
}

pub async fn get_doctor(
    State(directory): State<Arc<DirectoryService>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory
        .doctor(&doctor_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "doctor": doctor })))
}

pub async fn get_booking_options(
    State(directory): State<Arc<DirectoryService>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let catalog = directory
        .booking_options(&doctor_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "booking_options": catalog })))
}

pub async fn get_specialities(
    State(directory): State<Arc<DirectoryService>>,
) -> Json<Value> {
    Json(json!({ "specialities": directory.specialities().await }))
}

pub async fn get_locations(State(directory): State<Arc<DirectoryService>>) -> Json<Value> {
    Json(json!({ "locations": directory.locations().await }))
}

pub async fn get_filter_panel(State(directory): State<Arc<DirectoryService>>) -> Json<Value> {
    Json(json!({ "filters": directory.panel() }))
}

pub async fn toggle_filter(
    State(directory): State<Arc<DirectoryService>>,
    Json(request): Json<ToggleFilterRequest>,
) -> Json<Value> {
    let panel = directory.toggle_filter(request.filter);
    Json(json!({ "filters": panel }))
}

pub async fn select_filter(
    State(directory): State<Arc<DirectoryService>>,
    Json(request): Json<SelectFilterRequest>,
) -> Result<Json<Value>, AppError> {
    let panel = match (request.speciality, request.location) {
        (Some(speciality), None) => directory.select_speciality(&speciality),
        (None, Some(location)) => directory.select_location(&location),
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of speciality or location".to_string(),
            ))
        }
    };

    Ok(Json(json!({ "filters": panel })))
}
