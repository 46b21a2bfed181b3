use tracing::debug;

use crate::models::{Coupon, CouponKind, PricingSummary, PLATFORM_FEE, TAX};

/// Order pricing in whole-rupee integer arithmetic.
pub struct PricingService;

impl PricingService {
    /// Summary for a given appointment fee with at most one coupon applied.
    pub fn quote(appointment_fee: i64, coupon: Option<&Coupon>) -> PricingSummary {
        let discount = coupon
            .map(|c| Self::discount_amount(appointment_fee, c))
            .unwrap_or(0);

        let summary = PricingSummary {
            appointment_fee,
            platform_fee: PLATFORM_FEE,
            tax: TAX,
            discount,
            grand_total: appointment_fee + PLATFORM_FEE + TAX - discount,
        };

        debug!(
            "Quoted fee {} discount {} total {}",
            summary.appointment_fee, summary.discount, summary.grand_total
        );
        summary
    }

    /// Percentage discounts truncate toward zero (display parity: never round
    /// up). Flat discounts are capped at the fee, so the grand total never
    /// drops below platform fee + tax.
    pub fn discount_amount(appointment_fee: i64, coupon: &Coupon) -> i64 {
        match coupon.kind {
            CouponKind::Percentage => appointment_fee * coupon.discount / 100,
            CouponKind::Flat => coupon.discount.min(appointment_fee),
        }
    }
}
