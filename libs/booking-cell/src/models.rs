use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use catalog_cell::models::PlanOption;

// ==============================================================================
// SELECTION STATE
// ==============================================================================

/// The three mutually dependent selections of one booking context. All fields
/// start unset and are discarded when the context collapses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectionState {
    pub plan_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl SelectionState {
    pub fn is_complete(&self) -> bool {
        self.plan_id.is_some() && self.date.is_some() && self.time.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    Collapsed,
    NoPlan,
    PlanChosen,
    DateChosen,
    Ready,
}

impl fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStage::Collapsed => write!(f, "collapsed"),
            SelectionStage::NoPlan => write!(f, "no_plan"),
            SelectionStage::PlanChosen => write!(f, "plan_chosen"),
            SelectionStage::DateChosen => write!(f, "date_chosen"),
            SelectionStage::Ready => write!(f, "ready"),
        }
    }
}

// ==============================================================================
// BOOKING INTENT
// ==============================================================================

/// Immutable snapshot of a completed selection. Ownership passes to checkout;
/// the engine does not retain it after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingIntent {
    pub id: Uuid,
    pub doctor_id: String,
    pub plan: PlanOption,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// PRICING
// ==============================================================================

/// Flat per-booking platform fee, in whole rupees.
pub const PLATFORM_FEE: i64 = 30;

/// Tax is zero in the current fixture set but carried as a line item.
pub const TAX: i64 = 0;

/// Derived on demand from the chosen plan and the applied coupon; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingSummary {
    pub appointment_fee: i64,
    pub platform_fee: i64,
    pub tax: i64,
    pub discount: i64,
    pub grand_total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    Percentage,
    Flat,
}

/// An independently applied discount modifier. Coupons affect only the
/// pricing summary, never the selection state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    pub id: String,
    pub title: String,
    pub discount: i64,
    pub kind: CouponKind,
    pub description: String,
    pub badge: String,
    pub validity: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

/// Deterministic input-validation rejections. The engine returns to its prior
/// state unchanged; none of these are retryable automatically.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No slots remaining on {0}")]
    SlotUnavailable(String),

    #[error("Selection incomplete: {0}")]
    IncompleteSelection(String),

    #[error("Booking context is collapsed")]
    ContextCollapsed,

    #[error("Doctor not found: {0}")]
    UnknownDoctor(String),
}
