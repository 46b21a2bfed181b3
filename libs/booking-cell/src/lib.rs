pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::contexts::{BookingContexts, ContextView};
pub use services::pricing::PricingService;
pub use services::selection::SelectionEngine;
