use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use catalog_cell::models::DoctorCatalog;

use crate::models::{
    BookingError, BookingIntent, Coupon, PricingSummary, SelectionStage, SelectionState,
};
use crate::services::pricing::PricingService;

/// The plan/date/time selection sequence for one doctor context.
///
/// Selections are validated against the catalog the engine was created with;
/// the surrounding UI hides invalid actions, but the engine never trusts that
/// and re-validates every transition. Every rejection leaves the state
/// exactly as it was.
pub struct SelectionEngine {
    doctor_id: String,
    catalog: DoctorCatalog,
    expanded: bool,
    selection: SelectionState,
}

impl SelectionEngine {
    /// A fresh engine starts collapsed with nothing selected.
    pub fn new(doctor_id: &str, catalog: DoctorCatalog) -> Self {
        Self {
            doctor_id: doctor_id.to_string(),
            catalog,
            expanded: false,
            selection: SelectionState::default(),
        }
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn catalog(&self) -> &DoctorCatalog {
        &self.catalog
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn stage(&self) -> SelectionStage {
        if !self.expanded {
            SelectionStage::Collapsed
        } else if self.selection.plan_id.is_none() {
            SelectionStage::NoPlan
        } else if self.selection.date.is_none() {
            SelectionStage::PlanChosen
        } else if self.selection.time.is_none() {
            SelectionStage::DateChosen
        } else {
            SelectionStage::Ready
        }
    }

    /// All three selections present.
    pub fn can_proceed(&self) -> bool {
        self.selection.is_complete()
    }

    // ==============================================================================
    // TRANSITIONS
    // ==============================================================================

    /// The expand control toggles: a collapsed context opens with a fresh
    /// selection, an expanded one collapses and discards it.
    pub fn toggle(&mut self) -> SelectionStage {
        if self.expanded {
            self.collapse();
        } else {
            self.expand();
        }
        self.stage()
    }

    pub fn expand(&mut self) {
        if !self.expanded {
            debug!("Expanding booking context for doctor {}", self.doctor_id);
            self.expanded = true;
            self.selection.clear();
        }
    }

    pub fn collapse(&mut self) {
        if self.expanded {
            debug!("Collapsing booking context for doctor {}", self.doctor_id);
        }
        self.expanded = false;
        self.selection.clear();
    }

    /// Legal from any expanded sub-state; re-choosing is always allowed and
    /// overwrites the previous plan. Switching to a different plan invalidates
    /// the chosen date and time; re-choosing the same plan leaves them intact.
    pub fn choose_plan(&mut self, plan_id: &str) -> Result<(), BookingError> {
        self.require_expanded()?;

        if self.catalog.plan(plan_id).is_none() {
            return Err(BookingError::InvalidSelection(format!(
                "unknown plan {}",
                plan_id
            )));
        }

        if self.selection.plan_id.as_deref() != Some(plan_id) {
            self.selection.date = None;
            self.selection.time = None;
        }
        self.selection.plan_id = Some(plan_id.to_string());

        debug!(
            "Doctor {}: plan {} chosen, stage now {}",
            self.doctor_id,
            plan_id,
            self.stage()
        );
        Ok(())
    }

    /// Requires a chosen plan and remaining capacity on the date. Switching to
    /// a different date invalidates the chosen time.
    pub fn choose_date(&mut self, date: &str) -> Result<(), BookingError> {
        self.require_expanded()?;

        if self.selection.plan_id.is_none() {
            return Err(BookingError::IncompleteSelection(
                "choose a plan before picking a date".to_string(),
            ));
        }

        let slot = self.catalog.date(date).ok_or_else(|| {
            BookingError::InvalidSelection(format!("unknown date {}", date))
        })?;

        if !slot.is_selectable() {
            return Err(BookingError::SlotUnavailable(date.to_string()));
        }

        if self.selection.date.as_deref() != Some(date) {
            self.selection.time = None;
        }
        self.selection.date = Some(date.to_string());
        Ok(())
    }

    /// Requires a chosen date.
    pub fn choose_time(&mut self, time: &str) -> Result<(), BookingError> {
        self.require_expanded()?;

        if self.selection.date.is_none() {
            return Err(BookingError::IncompleteSelection(
                "choose a date before picking a time".to_string(),
            ));
        }

        if !self.catalog.has_time(time) {
            return Err(BookingError::InvalidSelection(format!(
                "unknown time slot {}",
                time
            )));
        }

        self.selection.time = Some(time.to_string());
        Ok(())
    }

    /// Emits the immutable booking snapshot once all three selections are in
    /// place. The selection itself is not mutated; leaving the context is the
    /// navigation layer's job.
    pub fn confirm(&self) -> Result<BookingIntent, BookingError> {
        self.require_expanded()?;

        let (plan_id, date, time) = match (
            &self.selection.plan_id,
            &self.selection.date,
            &self.selection.time,
        ) {
            (Some(plan_id), Some(date), Some(time)) => (plan_id, date, time),
            _ => {
                return Err(BookingError::IncompleteSelection(
                    "plan, date and time must all be selected".to_string(),
                ))
            }
        };

        let plan = self.catalog.plan(plan_id).ok_or_else(|| {
            BookingError::InvalidSelection(format!("unknown plan {}", plan_id))
        })?;

        debug!(
            "Doctor {}: confirming {} on {} at {}",
            self.doctor_id, plan.name, date, time
        );

        Ok(BookingIntent {
            id: Uuid::new_v4(),
            doctor_id: self.doctor_id.clone(),
            plan: plan.clone(),
            date: date.clone(),
            time: time.clone(),
            created_at: Utc::now(),
        })
    }

    /// Pricing summary for the chosen plan, with an optional coupon applied.
    pub fn pricing(&self, coupon: Option<&Coupon>) -> Result<PricingSummary, BookingError> {
        self.require_expanded()?;

        let plan_id = self.selection.plan_id.as_deref().ok_or_else(|| {
            BookingError::IncompleteSelection("no plan selected".to_string())
        })?;
        let plan = self.catalog.plan(plan_id).ok_or_else(|| {
            BookingError::InvalidSelection(format!("unknown plan {}", plan_id))
        })?;

        Ok(PricingService::quote(plan.price, coupon))
    }

    fn require_expanded(&self) -> Result<(), BookingError> {
        if self.expanded {
            Ok(())
        } else {
            Err(BookingError::ContextCollapsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use catalog_cell::models::{DateSlot, PlanOption};

    fn card_catalog() -> DoctorCatalog {
        DoctorCatalog {
            plans: vec![
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
            ],
            dates: vec![
                DateSlot {
                    date: "Fri,24 Oct '25".to_string(),
                    slots_remaining: 10,
                },
                DateSlot {
                    date: "Sat,25 Oct '25".to_string(),
                    slots_remaining: 0,
                },
            ],
            times: vec!["10:00 AM".to_string(), "11:30 AM".to_string()],
        }
    }

    fn expanded_engine() -> SelectionEngine {
        let mut engine = SelectionEngine::new("1", card_catalog());
        engine.expand();
        engine
    }

    #[test]
    fn test_new_engine_is_collapsed_and_empty() {
        let engine = SelectionEngine::new("1", card_catalog());
        assert_eq!(engine.stage(), SelectionStage::Collapsed);
        assert_eq!(*engine.selection(), SelectionState::default());
    }

    #[test]
    fn test_happy_path_reaches_ready_and_confirms() {
        let mut engine = expanded_engine();

        engine.choose_plan("1").unwrap();
        assert_eq!(engine.stage(), SelectionStage::PlanChosen);

        engine.choose_date("Fri,24 Oct '25").unwrap();
        assert_eq!(engine.stage(), SelectionStage::DateChosen);

        engine.choose_time("11:30 AM").unwrap();
        assert_eq!(engine.stage(), SelectionStage::Ready);
        assert!(engine.can_proceed());

        let intent = engine.confirm().unwrap();
        assert_eq!(intent.doctor_id, "1");
        assert_eq!(intent.plan.id, "1");
        assert_eq!(intent.plan.price, 800);
        assert_eq!(intent.date, "Fri,24 Oct '25");
        assert_eq!(intent.time, "11:30 AM");
    }

    #[test]
    fn test_sold_out_date_is_rejected_and_state_unchanged() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();

        let before = engine.selection().clone();
        assert_matches!(
            engine.choose_date("Sat,25 Oct '25"),
            Err(BookingError::SlotUnavailable(_))
        );
        assert_eq!(*engine.selection(), before);
        assert_eq!(engine.selection().date, None);
    }

    #[test]
    fn test_unknown_plan_is_rejected() {
        let mut engine = expanded_engine();
        assert_matches!(
            engine.choose_plan("99"),
            Err(BookingError::InvalidSelection(_))
        );
        assert_eq!(engine.selection().plan_id, None);
    }

    #[test]
    fn test_unknown_date_and_time_are_rejected() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();

        assert_matches!(
            engine.choose_date("Sun,26 Oct '25"),
            Err(BookingError::InvalidSelection(_))
        );

        engine.choose_date("Fri,24 Oct '25").unwrap();
        assert_matches!(
            engine.choose_time("03:00 PM"),
            Err(BookingError::InvalidSelection(_))
        );
    }

    #[test]
    fn test_date_before_plan_is_rejected() {
        let mut engine = expanded_engine();
        assert_matches!(
            engine.choose_date("Fri,24 Oct '25"),
            Err(BookingError::IncompleteSelection(_))
        );
    }

    #[test]
    fn test_time_before_date_is_rejected() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();
        assert_matches!(
            engine.choose_time("10:00 AM"),
            Err(BookingError::IncompleteSelection(_))
        );
    }

    #[test]
    fn test_premature_confirm_is_rejected_without_intent() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();

        assert_matches!(
            engine.confirm(),
            Err(BookingError::IncompleteSelection(_))
        );
        // Selection untouched by the failed confirm.
        assert_eq!(engine.stage(), SelectionStage::PlanChosen);
    }

    #[test]
    fn test_choose_plan_is_idempotent() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();
        engine.choose_date("Fri,24 Oct '25").unwrap();
        engine.choose_time("10:00 AM").unwrap();

        // Same plan again: downstream selections survive.
        engine.choose_plan("1").unwrap();
        assert_eq!(engine.stage(), SelectionStage::Ready);
        assert_eq!(engine.selection().date.as_deref(), Some("Fri,24 Oct '25"));
        assert_eq!(engine.selection().time.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn test_switching_plan_invalidates_date_and_time() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();
        engine.choose_date("Fri,24 Oct '25").unwrap();
        engine.choose_time("10:00 AM").unwrap();

        engine.choose_plan("2").unwrap();
        assert_eq!(engine.stage(), SelectionStage::PlanChosen);
        assert_eq!(engine.selection().date, None);
        assert_eq!(engine.selection().time, None);
    }

    #[test]
    fn test_switching_date_invalidates_time() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();
        engine.choose_date("Fri,24 Oct '25").unwrap();
        engine.choose_time("10:00 AM").unwrap();

        // Re-choosing the same date keeps the time.
        engine.choose_date("Fri,24 Oct '25").unwrap();
        assert_eq!(engine.selection().time.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn test_collapse_discards_selection() {
        let mut engine = expanded_engine();
        engine.choose_plan("1").unwrap();
        engine.choose_date("Fri,24 Oct '25").unwrap();

        engine.collapse();
        engine.expand();

        assert_eq!(engine.stage(), SelectionStage::NoPlan);
        assert_eq!(*engine.selection(), SelectionState::default());
    }

    #[test]
    fn test_toggle_alternates_expand_collapse() {
        let mut engine = SelectionEngine::new("1", card_catalog());

        assert_eq!(engine.toggle(), SelectionStage::NoPlan);
        assert_eq!(engine.toggle(), SelectionStage::Collapsed);
        assert_eq!(engine.toggle(), SelectionStage::NoPlan);
    }

    #[test]
    fn test_actions_on_collapsed_context_are_rejected() {
        let mut engine = SelectionEngine::new("1", card_catalog());

        assert_matches!(engine.choose_plan("1"), Err(BookingError::ContextCollapsed));
        assert_matches!(
            engine.choose_date("Fri,24 Oct '25"),
            Err(BookingError::ContextCollapsed)
        );
        assert_matches!(engine.confirm(), Err(BookingError::ContextCollapsed));
    }

    #[test]
    fn test_pricing_requires_a_plan() {
        let engine = expanded_engine();
        assert_matches!(
            engine.pricing(None),
            Err(BookingError::IncompleteSelection(_))
        );
    }

    #[test]
    fn test_pricing_uses_selected_plan_fee() {
        let mut engine = expanded_engine();
        engine.choose_plan("2").unwrap();

        let summary = engine.pricing(None).unwrap();
        assert_eq!(summary.appointment_fee, 5142);
        assert_eq!(summary.grand_total, 5142 + 30);
    }
}
