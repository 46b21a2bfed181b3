use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use booking_cell::models::{Coupon, CouponKind, PricingSummary};
use catalog_cell::models::{Doctor, PlanOption};

// ==============================================================================
// ORDER MODELS
// ==============================================================================

/// The cart: one booking intent joined with its doctor record, plus at most
/// one applied coupon. A new intent replaces any order in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub id: Uuid,
    pub doctor: Doctor,
    pub plan: PlanOption,
    pub date: String,
    pub time: String,
    pub applied_coupon: Option<Coupon>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order: CheckoutOrder,
    pub pricing: PricingSummary,
}

/// Simulated payment result. No processor is involved; the receipt is the
/// whole outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub receipt_id: Uuid,
    pub doctor_name: String,
    pub total: i64,
    pub discount: i64,
    pub paid_through: String,
    pub paid_at: DateTime<Utc>,
}

// ==============================================================================
// APPOINTMENT RECORDS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
}

/// Persisted after a successful payment; shown on the appointments page.
/// Booking does not decrement date capacity in current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub doctor_name: String,
    pub speciality: String,
    pub date: String,
    pub time: String,
    pub plan_name: String,
    pub sessions: u32,
    pub price: i64,
    pub location: String,
    pub status: AppointmentStatus,
}

// ==============================================================================
// COUPON FIXTURES
// ==============================================================================

pub fn standard_coupons() -> Vec<Coupon> {
    vec![
        Coupon {
            id: "1".to_string(),
            title: "Patient loyalty discount".to_string(),
            discount: 10,
            kind: CouponKind::Percentage,
            description: "As part of our patient loyalty program, enjoy special discounts \
                on consultations and treatments - our way of thanking you for your \
                continued trust."
                .to_string(),
            badge: "10% OFF".to_string(),
            validity: "7 days".to_string(),
        },
        Coupon {
            id: "2".to_string(),
            title: "Support remediation".to_string(),
            discount: 20,
            kind: CouponKind::Percentage,
            description: "Get exclusive savings on your support remediation services. \
                Resolve issues quickly and efficiently with our expert assistance."
                .to_string(),
            badge: "20% OFF".to_string(),
            validity: "6 days".to_string(),
        },
        Coupon {
            id: "3".to_string(),
            title: "Marketplace discount".to_string(),
            discount: 5,
            kind: CouponKind::Percentage,
            description: "Enjoy an exclusive discount on your next consultation or \
                treatment. Book now and make the most of this limited-time offer."
                .to_string(),
            badge: "05% OFF".to_string(),
            validity: "18 days".to_string(),
        },
    ]
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CheckoutError {
    #[error("No active checkout order")]
    NoActiveOrder,

    #[error("Unknown coupon: {0}")]
    UnknownCoupon(String),

    #[error("Doctor not found: {0}")]
    UnknownDoctor(String),

    #[error("Checkout storage error: {0}")]
    Storage(String),
}
