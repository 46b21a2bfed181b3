use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use booking_cell::models::{BookingIntent, Coupon};
use booking_cell::services::pricing::PricingService;
use catalog_cell::models::CatalogError;
use catalog_cell::services::provider::CatalogProvider;
use shared_storage::{KvStore, StorageError};

use crate::models::{
    AppointmentRecord, AppointmentStatus, CheckoutError, CheckoutOrder, OrderSummary,
    PaymentReceipt,
};

const APPOINTMENTS_KEY: &str = "appointments";
const PAYMENT_METHOD: &str = "Gpay";

/// Cart and simulated payment. Holds at most one order in progress; paying
/// turns it into a receipt plus a persisted appointment record.
pub struct CheckoutService {
    provider: Arc<dyn CatalogProvider>,
    store: Arc<dyn KvStore>,
    coupons: Vec<Coupon>,
    order: Mutex<Option<CheckoutOrder>>,
}

impl CheckoutService {
    pub fn new(provider: Arc<dyn CatalogProvider>, store: Arc<dyn KvStore>) -> Self {
        Self {
            provider,
            store,
            coupons: crate::models::standard_coupons(),
            order: Mutex::new(None),
        }
    }

    /// Takes ownership of a booking intent and opens the cart for it. Any
    /// order already in progress is replaced.
    pub async fn begin(&self, intent: BookingIntent) -> Result<OrderSummary, CheckoutError> {
        let doctor = self
            .provider
            .doctor(&intent.doctor_id)
            .await
            .map_err(map_catalog_error)?;

        let order = CheckoutOrder {
            id: Uuid::new_v4(),
            doctor,
            plan: intent.plan,
            date: intent.date,
            time: intent.time,
            applied_coupon: None,
            created_at: Utc::now(),
        };

        let mut slot = self.lock_order();
        if let Some(previous) = slot.as_ref() {
            warn!("Replacing in-progress checkout order {}", previous.id);
        }
        info!(
            "Checkout opened for {} ({} on {} at {})",
            order.doctor.name, order.plan.name, order.date, order.time
        );
        let summary = summarize(&order);
        *slot = Some(order);
        Ok(summary)
    }

    pub fn current(&self) -> Result<OrderSummary, CheckoutError> {
        let slot = self.lock_order();
        slot.as_ref()
            .map(summarize)
            .ok_or(CheckoutError::NoActiveOrder)
    }

    pub fn coupons(&self) -> Vec<Coupon> {
        self.coupons.clone()
    }

    /// Applies a coupon to the active order. Re-applying replaces the
    /// previous coupon; there is no stacking.
    pub fn apply_coupon(&self, coupon_id: &str) -> Result<OrderSummary, CheckoutError> {
        let coupon = self
            .coupons
            .iter()
            .find(|c| c.id == coupon_id)
            .cloned()
            .ok_or_else(|| CheckoutError::UnknownCoupon(coupon_id.to_string()))?;

        let mut slot = self.lock_order();
        let order = slot.as_mut().ok_or(CheckoutError::NoActiveOrder)?;

        debug!("Applying coupon {} to order {}", coupon.id, order.id);
        order.applied_coupon = Some(coupon);
        Ok(summarize(order))
    }

    pub fn remove_coupon(&self) -> Result<OrderSummary, CheckoutError> {
        let mut slot = self.lock_order();
        let order = slot.as_mut().ok_or(CheckoutError::NoActiveOrder)?;
        order.applied_coupon = None;
        Ok(summarize(order))
    }

    /// Simulated payment: no processor round trip. The order becomes a
    /// receipt and an upcoming appointment record in the durable store.
    pub fn pay(&self) -> Result<PaymentReceipt, CheckoutError> {
        let mut slot = self.lock_order();
        let order = slot.take().ok_or(CheckoutError::NoActiveOrder)?;

        let pricing = PricingService::quote(order.plan.price, order.applied_coupon.as_ref());

        let record = AppointmentRecord {
            id: Uuid::new_v4(),
            doctor_name: order.doctor.name.clone(),
            speciality: order.doctor.speciality.clone(),
            date: order.date.clone(),
            time: order.time.clone(),
            plan_name: order.plan.name.clone(),
            sessions: order.plan.sessions,
            price: order.plan.price,
            location: order.doctor.address.clone(),
            status: AppointmentStatus::Upcoming,
        };
        self.append_appointment(record)?;

        let receipt = PaymentReceipt {
            receipt_id: Uuid::new_v4(),
            doctor_name: order.doctor.name.clone(),
            total: pricing.grand_total,
            discount: pricing.discount,
            paid_through: PAYMENT_METHOD.to_string(),
            paid_at: Utc::now(),
        };

        info!(
            "Payment of {} recorded for {} (receipt {})",
            receipt.total, receipt.doctor_name, receipt.receipt_id
        );
        Ok(receipt)
    }

    pub fn appointments(&self) -> Result<Vec<AppointmentRecord>, CheckoutError> {
        let raw = self
            .store
            .get(APPOINTMENTS_KEY)
            .map_err(map_storage_error)?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| CheckoutError::Storage(format!("corrupt appointment list: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    // ==============================================================================
    // PRIVATE HELPERS
    // ==============================================================================

    fn append_appointment(&self, record: AppointmentRecord) -> Result<(), CheckoutError> {
        let mut records = self.appointments()?;
        records.push(record);

        let raw = serde_json::to_string(&records)
            .map_err(|e| CheckoutError::Storage(e.to_string()))?;
        self.store
            .set(APPOINTMENTS_KEY, &raw)
            .map_err(map_storage_error)
    }

    fn lock_order(&self) -> std::sync::MutexGuard<'_, Option<CheckoutOrder>> {
        self.order.lock().expect("checkout order lock poisoned")
    }
}

fn summarize(order: &CheckoutOrder) -> OrderSummary {
    OrderSummary {
        order: order.clone(),
        pricing: PricingService::quote(order.plan.price, order.applied_coupon.as_ref()),
    }
}

fn map_catalog_error(err: CatalogError) -> CheckoutError {
    match err {
        CatalogError::DoctorNotFound(id) => CheckoutError::UnknownDoctor(id),
        CatalogError::InvalidPlan { plan_id, reason } => {
            CheckoutError::Storage(format!("invalid plan {}: {}", plan_id, reason))
        }
    }
}

fn map_storage_error(err: StorageError) -> CheckoutError {
    CheckoutError::Storage(err.to_string())
}
