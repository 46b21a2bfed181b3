use async_trait::async_trait;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    CatalogError, DateSlot, Doctor, DoctorCatalog, DoctorSearchFilters, PlanOption,
};

/// Supplies doctors and their booking catalogs. The booking cell treats the
/// returned catalog as read-only for the duration of one booking context.
///
/// Backed by fixtures today; a real backend would implement this same trait
/// (and would be the place to add capacity revalidation).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn doctor(&self, doctor_id: &str) -> Result<Doctor, CatalogError>;

    async fn list_doctors(
        &self,
        filters: &DoctorSearchFilters,
    ) -> Result<Vec<Doctor>, CatalogError>;

    async fn catalog_for(&self, doctor_id: &str) -> Result<DoctorCatalog, CatalogError>;

    async fn specialities(&self) -> Vec<String>;

    async fn locations(&self) -> Vec<String>;
}

// ==============================================================================
// FIXTURE PROVIDER
// ==============================================================================

/// Hardcoded catalog matching the production listing. Every doctor currently
/// shares one plan/date/time catalog.
pub struct FixtureCatalog {
    doctors: Vec<Doctor>,
    catalog: DoctorCatalog,
    specialities: Vec<String>,
    locations: Vec<String>,
}

impl FixtureCatalog {
    /// Builds the fixture set, validating plan data up front so inconsistent
    /// display fields never reach a booking context.
    pub fn new() -> Result<Self, CatalogError> {
        let catalog = DoctorCatalog {
            plans: standard_plans(),
            dates: standard_dates(),
            times: standard_times(),
        };
        catalog.validate()?;

        Ok(Self {
            doctors: fixture_doctors(),
            catalog,
            specialities: vec![
                "Physiotherapist".to_string(),
                "Cardiologist".to_string(),
                "Dermatologist".to_string(),
                "Orthopedic".to_string(),
                "Pediatrician".to_string(),
                "General physician".to_string(),
            ],
            locations: vec![
                "Mumbai".to_string(),
                "Delhi".to_string(),
                "Bangalore".to_string(),
                "Chennai".to_string(),
                "Pune".to_string(),
                "Hyderabad".to_string(),
            ],
        })
    }
}

#[async_trait]
impl CatalogProvider for FixtureCatalog {
    async fn doctor(&self, doctor_id: &str) -> Result<Doctor, CatalogError> {
        self.doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or_else(|| CatalogError::DoctorNotFound(doctor_id.to_string()))
    }

    async fn list_doctors(
        &self,
        filters: &DoctorSearchFilters,
    ) -> Result<Vec<Doctor>, CatalogError> {
        debug!("Listing doctors with filters: {:?}", filters);

        let matches_filter = |value: &str, filter: &Option<String>| {
            filter
                .as_ref()
                .map(|f| value.to_lowercase().contains(&f.to_lowercase()))
                .unwrap_or(true)
        };

        Ok(self
            .doctors
            .iter()
            .filter(|d| matches_filter(&d.speciality, &filters.speciality))
            .filter(|d| matches_filter(&d.location, &filters.location))
            .cloned()
            .collect())
    }

    async fn catalog_for(&self, doctor_id: &str) -> Result<DoctorCatalog, CatalogError> {
        // Existence check first so an unknown doctor never gets a catalog.
        self.doctor(doctor_id).await?;
        Ok(self.catalog.clone())
    }

    async fn specialities(&self) -> Vec<String> {
        self.specialities.clone()
    }

    async fn locations(&self) -> Vec<String> {
        self.locations.clone()
    }
}

// ==============================================================================
// FIXTURE DATA
// ==============================================================================

fn standard_plans() -> Vec<PlanOption> {
    vec![
        PlanOption {
            id: "1".to_string(),
            name: "Single session".to_string(),
            price: 800,
            sessions: 1,
            discount: None,
            original_price: None,
        },
        PlanOption {
            id: "2".to_string(),
            name: "Rise".to_string(),
            price: 5142,
            sessions: 7,
            discount: Some(8),
            original_price: Some(5600),
        },
        PlanOption {
            id: "3".to_string(),
            name: "Shine".to_string(),
            price: 10080,
            sessions: 14,
            discount: Some(10),
            original_price: Some(11200),
        },
        PlanOption {
            id: "4".to_string(),
            name: "Conquer".to_string(),
            price: 21120,
            sessions: 30,
            discount: Some(12),
            original_price: Some(24000),
        },
    ]
}

fn standard_dates() -> Vec<DateSlot> {
    vec![
        DateSlot {
            date: "Thu,23 Oct '25".to_string(),
            slots_remaining: 4,
        },
        DateSlot {
            date: "Fri,24 Oct '25".to_string(),
            slots_remaining: 10,
        },
        DateSlot {
            date: "Sat,25 Oct '25".to_string(),
            slots_remaining: 0,
        },
    ]
}

fn standard_times() -> Vec<String> {
    vec![
        "10:00 AM".to_string(),
        "11:30 AM".to_string(),
        "02:00 PM".to_string(),
        "04:30 PM".to_string(),
    ]
}

const FIXTURE_ADDRESS: &str =
    "Flat 402, SP Wing, Greenview Apartments, Lush Road, Mumbai, Maharashtra - 400062";

fn fixture_doctors() -> Vec<Doctor> {
    let doctor = |id: &str, name: &str, speciality: &str, experience: &str, rating: f32,
                  reviews: u32, price: i64, seed: &str| Doctor {
        id: id.to_string(),
        name: name.to_string(),
        speciality: speciality.to_string(),
        experience: experience.to_string(),
        location: "Mumbai, Maharashtra".to_string(),
        rating,
        reviews,
        price,
        image_url: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed),
        availability: "Home - Visit".to_string(),
        address: FIXTURE_ADDRESS.to_string(),
    };

    vec![
        doctor("1", "Dr. Anjali Kumar", "General physiotherapist", "2 years experience", 4.0, 4, 800, "Anjali"),
        doctor("2", "Dr. Neel Naik", "Orthopedic physiotherapist", "10 years experience", 3.0, 3, 1000, "Neel"),
        doctor("3", "Dr. Apoorvaa Kashikar", "Pediatric neuro", "5 years experience", 4.0, 4, 500, "Apoorvaa"),
        doctor("4", "Dr. Anjali Kumar", "Ergonomics & Industrial health", "2 years experience", 4.0, 4, 800, "Anjali2"),
        doctor("5", "Dr. Neel Naik", "Orthopedic physiotherapist", "12 years experience", 4.0, 4, 800, "Neel2"),
        doctor("6", "Dr. Apoorvaa Kashikar", "Musculoskeletal & sports health", "8 years experience", 4.0, 4, 500, "Apoorvaa2"),
    ]
}
