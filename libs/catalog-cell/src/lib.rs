pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::directory::DirectoryService;
pub use services::provider::{CatalogProvider, FixtureCatalog};

#[cfg(test)]
pub use services::provider::MockCatalogProvider;
