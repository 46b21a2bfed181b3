use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::booking_routes;
use booking_cell::services::contexts::BookingContexts;
use catalog_cell::models::CatalogError;
use catalog_cell::router::catalog_routes;
use catalog_cell::services::directory::DirectoryService;
use catalog_cell::services::provider::{CatalogProvider, FixtureCatalog};
use checkout_cell::router::{appointments_routes, checkout_routes};
use checkout_cell::services::checkout::CheckoutService;
use session_cell::router::session_routes;
use session_cell::services::session::SessionService;
use shared_storage::KvStore;

pub struct ApiServices {
    pub directory: Arc<DirectoryService>,
    pub contexts: Arc<BookingContexts>,
    pub sessions: Arc<SessionService>,
    pub checkout: Arc<CheckoutService>,
}

impl ApiServices {
    pub fn build(store: Arc<dyn KvStore>) -> Result<Self, CatalogError> {
        let provider: Arc<dyn CatalogProvider> = Arc::new(FixtureCatalog::new()?);

        Ok(Self {
            directory: Arc::new(DirectoryService::new(provider.clone())),
            contexts: Arc::new(BookingContexts::new(provider.clone())),
            sessions: Arc::new(SessionService::new(store.clone())),
            checkout: Arc::new(CheckoutService::new(provider, store)),
        })
    }
}

pub fn create_router(services: ApiServices) -> Router {
    Router::new()
        .route("/", get(|| async { "PockyDoc API is running!" }))
        .nest("/catalog", catalog_routes(services.directory))
        .nest("/booking", booking_routes(services.contexts))
        .nest("/session", session_routes(services.sessions.clone()))
        .nest(
            "/checkout",
            checkout_routes(services.checkout.clone(), services.sessions.clone()),
        )
        .nest(
            "/appointments",
            appointments_routes(services.checkout, services.sessions),
        )
}
