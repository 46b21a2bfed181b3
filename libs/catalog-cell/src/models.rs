use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// CATALOG ENTITIES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub speciality: String,
    pub experience: String,
    pub location: String,
    pub rating: f32,
    pub reviews: u32,
    pub price: i64,
    pub image_url: String,
    pub availability: String,
    pub address: String,
}

/// A purchasable care plan: one or more appointment sessions at a fixed price.
///
/// `discount` and `original_price` are declarative display data and are never
/// re-derived from `price` at runtime; `validate` checks them once at load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanOption {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub sessions: u32,
    pub discount: Option<u8>,
    pub original_price: Option<i64>,
}

impl PlanOption {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.price < 0 {
            return Err(CatalogError::InvalidPlan {
                plan_id: self.id.clone(),
                reason: "price must be non-negative".to_string(),
            });
        }
        if self.sessions < 1 {
            return Err(CatalogError::InvalidPlan {
                plan_id: self.id.clone(),
                reason: "session count must be at least 1".to_string(),
            });
        }
        if let Some(discount) = self.discount {
            if discount > 100 {
                return Err(CatalogError::InvalidPlan {
                    plan_id: self.id.clone(),
                    reason: format!("discount {}% is out of range", discount),
                });
            }
        }
        if let Some(original) = self.original_price {
            if self.price > original {
                return Err(CatalogError::InvalidPlan {
                    plan_id: self.id.clone(),
                    reason: format!(
                        "price {} exceeds original price {}",
                        self.price, original
                    ),
                });
            }
        }
        Ok(())
    }
}

/// One offerable appointment date. The label is an opaque display string;
/// capacity is tracked per date, not per time slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateSlot {
    pub date: String,
    pub slots_remaining: u32,
}

impl DateSlot {
    pub fn is_selectable(&self) -> bool {
        self.slots_remaining > 0
    }
}

/// Everything a booking context needs for one doctor: ordered plans, dates and
/// time slots in display order. Immutable for the life of the context; there
/// is no mid-flow capacity revalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCatalog {
    pub plans: Vec<PlanOption>,
    pub dates: Vec<DateSlot>,
    pub times: Vec<String>,
}

impl DoctorCatalog {
    pub fn plan(&self, plan_id: &str) -> Option<&PlanOption> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn date(&self, date: &str) -> Option<&DateSlot> {
        self.dates.iter().find(|d| d.date == date)
    }

    pub fn has_time(&self, time: &str) -> bool {
        self.times.iter().any(|t| t == time)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for plan in &self.plans {
            plan.validate()?;
        }
        Ok(())
    }
}

// ==============================================================================
// DIRECTORY SEARCH
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub speciality: Option<String>,
    pub location: Option<String>,
}

/// Which directory filter popover is open. At most one can be open at a time;
/// making that structural replaces the pair of independent booleans the
/// listing page juggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenFilter {
    Speciality,
    Location,
}

impl fmt::Display for OpenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenFilter::Speciality => write!(f, "speciality"),
            OpenFilter::Location => write!(f, "location"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterPanel {
    pub speciality: String,
    pub location: String,
    pub open: Option<OpenFilter>,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self {
            speciality: "Physiotherapist".to_string(),
            location: "Mumbai".to_string(),
            open: None,
        }
    }
}

impl FilterPanel {
    /// Clicking a filter control: opens it (closing the other) or closes it
    /// when it is already the open one.
    pub fn toggle(&mut self, filter: OpenFilter) {
        self.open = if self.open == Some(filter) {
            None
        } else {
            Some(filter)
        };
    }

    pub fn select_speciality(&mut self, value: &str) {
        self.speciality = value.to_string();
        self.open = None;
    }

    pub fn select_location(&mut self, value: &str) {
        self.location = value.to_string();
        self.open = None;
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CatalogError {
    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("Invalid plan fixture {plan_id}: {reason}")]
    InvalidPlan { plan_id: String, reason: String },
}
