use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use booking_cell::models::BookingIntent;
use shared_models::error::AppError;
use shared_models::session::SessionUser;
use shared_utils::currency::format_inr;

use crate::models::{CheckoutError, OrderSummary};
use crate::services::checkout::CheckoutService;

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub coupon_id: String,
}

/// Order payloads carry the formatted grand total alongside the integer
/// amounts, matching the ₹-prefixed display the cart renders.
fn order_response(summary: OrderSummary) -> Json<Value> {
    let display_grand_total = format_inr(summary.pricing.grand_total);
    Json(json!({
        "order": summary,
        "display_grand_total": display_grand_total
    }))
}

fn map_checkout_error(err: CheckoutError) -> AppError {
    match err {
        CheckoutError::NoActiveOrder => AppError::NotFound("No booking data".to_string()),
        CheckoutError::UnknownCoupon(id) => {
            AppError::NotFound(format!("Coupon {} not found", id))
        }
        CheckoutError::UnknownDoctor(id) => {
            AppError::NotFound(format!("Doctor {} not found", id))
        }
        CheckoutError::Storage(msg) => AppError::Storage(msg),
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

/// The navigation handoff: checkout takes ownership of a confirmed booking
/// intent and opens the cart.
pub async fn create_order(
    State(checkout): State<Arc<CheckoutService>>,
    Json(intent): Json<BookingIntent>,
) -> Result<Json<Value>, AppError> {
    debug!("Opening checkout for intent {}", intent.id);

    let summary = checkout
        .begin(intent)
        .await
        .map_err(map_checkout_error)?;

    Ok(order_response(summary))
}

pub async fn get_order(
    State(checkout): State<Arc<CheckoutService>>,
) -> Result<Json<Value>, AppError> {
    let summary = checkout.current().map_err(map_checkout_error)?;
    Ok(order_response(summary))
}

pub async fn list_coupons(State(checkout): State<Arc<CheckoutService>>) -> Json<Value> {
    Json(json!({ "coupons": checkout.coupons() }))
}

pub async fn apply_coupon(
    State(checkout): State<Arc<CheckoutService>>,
    Json(request): Json<ApplyCouponRequest>,
) -> Result<Json<Value>, AppError> {
    let summary = checkout
        .apply_coupon(&request.coupon_id)
        .map_err(map_checkout_error)?;

    Ok(order_response(summary))
}

pub async fn remove_coupon(
    State(checkout): State<Arc<CheckoutService>>,
) -> Result<Json<Value>, AppError> {
    let summary = checkout.remove_coupon().map_err(map_checkout_error)?;
    Ok(order_response(summary))
}

/// Session-guarded: the middleware has already placed the user in extensions.
pub async fn pay(
    State(checkout): State<Arc<CheckoutService>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Value>, AppError> {
    let receipt = checkout.pay().map_err(map_checkout_error)?;

    info!("Payment completed by {}", user.contact);

    let display_total = format_inr(receipt.total);
    Ok(Json(json!({
        "receipt": receipt,
        "display_total": display_total,
        "message": "Payment successful. Your appointment has been booked!"
    })))
}

pub async fn list_appointments(
    State(checkout): State<Arc<CheckoutService>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Value>, AppError> {
    debug!("Listing appointments for {}", user.contact);

    let appointments = checkout.appointments().map_err(map_checkout_error)?;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}
