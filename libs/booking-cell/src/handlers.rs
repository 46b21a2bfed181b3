use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::BookingError;
use crate::services::contexts::BookingContexts;

// ==============================================================================
// REQUEST STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectDateRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}

fn map_booking_error(err: BookingError) -> AppError {
    match &err {
        BookingError::UnknownDoctor(id) => {
            AppError::NotFound(format!("Doctor {} not found", id))
        }
        BookingError::SlotUnavailable(date) => {
            AppError::Conflict(format!("No slots remaining on {}", date))
        }
        BookingError::InvalidSelection(_)
        | BookingError::IncompleteSelection(_)
        | BookingError::ContextCollapsed => AppError::BadRequest(err.to_string()),
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

/// Card click: expand when collapsed, collapse (and discard the selection)
/// when expanded.
pub async fn toggle_context(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("Toggling booking context for doctor {}", doctor_id);

    let view = contexts
        .toggle(&doctor_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "context": view })))
}

pub async fn collapse_context(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let view = contexts
        .collapse(&doctor_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "context": view })))
}

pub async fn get_context(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let view = contexts.view(&doctor_id).await.map_err(map_booking_error)?;
    Ok(Json(json!({ "context": view })))
}

pub async fn select_plan(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<SelectPlanRequest>,
) -> Result<Json<Value>, AppError> {
    let view = contexts
        .choose_plan(&doctor_id, &request.plan_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "context": view })))
}

pub async fn select_date(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<SelectDateRequest>,
) -> Result<Json<Value>, AppError> {
    let view = contexts
        .choose_date(&doctor_id, &request.date)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "context": view })))
}

pub async fn select_time(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<SelectTimeRequest>,
) -> Result<Json<Value>, AppError> {
    let view = contexts
        .choose_time(&doctor_id, &request.time)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "context": view })))
}

/// Coupon-free pricing for the expanded card; coupons are applied at checkout.
pub async fn get_pricing(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let summary = contexts
        .pricing(&doctor_id, None)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "pricing": summary })))
}

/// Terminal action: emits the booking intent for checkout to consume.
pub async fn confirm_booking(
    State(contexts): State<Arc<BookingContexts>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let intent = contexts
        .confirm(&doctor_id)
        .await
        .map_err(map_booking_error)?;

    debug!(
        "Booking intent {} emitted for doctor {}",
        intent.id, doctor_id
    );

    Ok(Json(json!({ "booking_intent": intent })))
}
