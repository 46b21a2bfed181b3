use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use catalog_cell::services::provider::CatalogProvider;
use catalog_cell::models::CatalogError;

use crate::models::{
    BookingError, BookingIntent, Coupon, PricingSummary, SelectionStage, SelectionState,
};
use crate::services::selection::SelectionEngine;

/// Snapshot of one context, as consumed by views.
#[derive(Debug, Clone, Serialize)]
pub struct ContextView {
    pub doctor_id: String,
    pub stage: SelectionStage,
    pub selection: SelectionState,
    pub can_proceed: bool,
}

impl ContextView {
    fn of(engine: &SelectionEngine) -> Self {
        Self {
            doctor_id: engine.doctor_id().to_string(),
            stage: engine.stage(),
            selection: engine.selection().clone(),
            can_proceed: engine.can_proceed(),
        }
    }

    fn collapsed(doctor_id: &str) -> Self {
        Self {
            doctor_id: doctor_id.to_string(),
            stage: SelectionStage::Collapsed,
            selection: SelectionState::default(),
            can_proceed: false,
        }
    }
}

/// One selection engine per doctor context. Contexts are independent: opening
/// or mutating one doctor's selection never disturbs another's.
pub struct BookingContexts {
    provider: Arc<dyn CatalogProvider>,
    engines: RwLock<HashMap<String, SelectionEngine>>,
}

impl BookingContexts {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Click on a doctor card: expands a collapsed context, collapses an
    /// expanded one. Creates the engine on first contact, which is also where
    /// the doctor id gets validated against the catalog.
    pub async fn toggle(&self, doctor_id: &str) -> Result<ContextView, BookingError> {
        self.ensure_engine(doctor_id).await?;

        let mut engines = self.write_engines();
        let engine = engines
            .get_mut(doctor_id)
            .ok_or_else(|| BookingError::UnknownDoctor(doctor_id.to_string()))?;
        let stage = engine.toggle();
        info!("Booking context for doctor {} now {}", doctor_id, stage);
        Ok(ContextView::of(engine))
    }

    pub async fn collapse(&self, doctor_id: &str) -> Result<ContextView, BookingError> {
        {
            let mut engines = self.write_engines();
            if let Some(engine) = engines.get_mut(doctor_id) {
                engine.collapse();
                return Ok(ContextView::of(engine));
            }
        }
        // Never opened: collapsing is a no-op, but the doctor must exist.
        self.require_doctor(doctor_id).await?;
        Ok(ContextView::collapsed(doctor_id))
    }

    pub async fn choose_plan(
        &self,
        doctor_id: &str,
        plan_id: &str,
    ) -> Result<ContextView, BookingError> {
        self.with_engine(doctor_id, |engine| engine.choose_plan(plan_id))
    }

    pub async fn choose_date(
        &self,
        doctor_id: &str,
        date: &str,
    ) -> Result<ContextView, BookingError> {
        self.with_engine(doctor_id, |engine| engine.choose_date(date))
    }

    pub async fn choose_time(
        &self,
        doctor_id: &str,
        time: &str,
    ) -> Result<ContextView, BookingError> {
        self.with_engine(doctor_id, |engine| engine.choose_time(time))
    }

    pub async fn confirm(&self, doctor_id: &str) -> Result<BookingIntent, BookingError> {
        let engines = self.read_engines();
        let engine = engines
            .get(doctor_id)
            .ok_or(BookingError::ContextCollapsed)?;
        engine.confirm()
    }

    pub async fn pricing(
        &self,
        doctor_id: &str,
        coupon: Option<&Coupon>,
    ) -> Result<PricingSummary, BookingError> {
        let engines = self.read_engines();
        let engine = engines
            .get(doctor_id)
            .ok_or(BookingError::ContextCollapsed)?;
        engine.pricing(coupon)
    }

    pub async fn view(&self, doctor_id: &str) -> Result<ContextView, BookingError> {
        {
            let engines = self.read_engines();
            if let Some(engine) = engines.get(doctor_id) {
                return Ok(ContextView::of(engine));
            }
        }
        self.require_doctor(doctor_id).await?;
        Ok(ContextView::collapsed(doctor_id))
    }

    // ==============================================================================
    // PRIVATE HELPERS
    // ==============================================================================

    /// Creates the engine for a doctor on first contact. The catalog is
    /// fetched outside the map lock and stays fixed for the context's life.
    async fn ensure_engine(&self, doctor_id: &str) -> Result<(), BookingError> {
        if self.read_engines().contains_key(doctor_id) {
            return Ok(());
        }

        let catalog = self
            .provider
            .catalog_for(doctor_id)
            .await
            .map_err(map_catalog_error)?;

        let mut engines = self.write_engines();
        engines
            .entry(doctor_id.to_string())
            .or_insert_with(|| SelectionEngine::new(doctor_id, catalog));
        debug!("Created booking context for doctor {}", doctor_id);
        Ok(())
    }

    async fn require_doctor(&self, doctor_id: &str) -> Result<(), BookingError> {
        self.provider
            .doctor(doctor_id)
            .await
            .map(|_| ())
            .map_err(map_catalog_error)
    }

    fn with_engine(
        &self,
        doctor_id: &str,
        op: impl FnOnce(&mut SelectionEngine) -> Result<(), BookingError>,
    ) -> Result<ContextView, BookingError> {
        let mut engines = self.write_engines();
        let engine = engines
            .get_mut(doctor_id)
            .ok_or(BookingError::ContextCollapsed)?;
        op(engine)?;
        Ok(ContextView::of(engine))
    }

    fn read_engines(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<String, SelectionEngine>> {
        self.engines.read().expect("booking context lock poisoned")
    }

    fn write_engines(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SelectionEngine>> {
        self.engines.write().expect("booking context lock poisoned")
    }
}

fn map_catalog_error(err: CatalogError) -> BookingError {
    match err {
        CatalogError::DoctorNotFound(id) => BookingError::UnknownDoctor(id),
        CatalogError::InvalidPlan { plan_id, reason } => {
            BookingError::InvalidSelection(format!("plan {}: {}", plan_id, reason))
        }
    }
}
