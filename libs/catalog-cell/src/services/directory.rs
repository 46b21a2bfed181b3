use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::models::{
    CatalogError, Doctor, DoctorCatalog, DoctorSearchFilters, FilterPanel, OpenFilter,
};
use crate::services::provider::CatalogProvider;

/// Doctor directory: search over the provider plus the process-wide filter
/// panel state for the listing page.
pub struct DirectoryService {
    provider: Arc<dyn CatalogProvider>,
    panel: Mutex<FilterPanel>,
}

impl DirectoryService {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            panel: Mutex::new(FilterPanel::default()),
        }
    }

    pub async fn list_doctors(
        &self,
        filters: &DoctorSearchFilters,
    ) -> Result<Vec<Doctor>, CatalogError> {
        let doctors = self.provider.list_doctors(filters).await?;
        debug!("Directory listing returned {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn doctor(&self, doctor_id: &str) -> Result<Doctor, CatalogError> {
        self.provider.doctor(doctor_id).await
    }

    pub async fn booking_options(&self, doctor_id: &str) -> Result<DoctorCatalog, CatalogError> {
        self.provider.catalog_for(doctor_id).await
    }

    pub async fn specialities(&self) -> Vec<String> {
        self.provider.specialities().await
    }

    pub async fn locations(&self) -> Vec<String> {
        self.provider.locations().await
    }

    // ==============================================================================
    // FILTER PANEL
    // ==============================================================================

    pub fn panel(&self) -> FilterPanel {
        self.panel.lock().expect("filter panel lock poisoned").clone()
    }

    pub fn toggle_filter(&self, filter: OpenFilter) -> FilterPanel {
        let mut panel = self.panel.lock().expect("filter panel lock poisoned");
        panel.toggle(filter);
        panel.clone()
    }

    pub fn select_speciality(&self, value: &str) -> FilterPanel {
        let mut panel = self.panel.lock().expect("filter panel lock poisoned");
        panel.select_speciality(value);
        info!("Directory speciality filter set to {}", value);
        panel.clone()
    }

    pub fn select_location(&self, value: &str) -> FilterPanel {
        let mut panel = self.panel.lock().expect("filter panel lock poisoned");
        panel.select_location(value);
        info!("Directory location filter set to {}", value);
        panel.clone()
    }
}
