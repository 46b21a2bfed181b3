//! In-process test harness: the full API router wired to fixture data and an
//! in-memory store, driven with `tower::ServiceExt::oneshot` instead of a
//! live server.

use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::booking_routes;
use booking_cell::services::contexts::BookingContexts;
use catalog_cell::router::catalog_routes;
use catalog_cell::services::directory::DirectoryService;
use catalog_cell::services::provider::{CatalogProvider, FixtureCatalog};
use checkout_cell::router::{appointments_routes, checkout_routes};
use checkout_cell::services::checkout::CheckoutService;
use session_cell::router::session_routes;
use session_cell::services::session::SessionService;
use shared_storage::{KvStore, MemoryStore};

/// The composed application exactly as `pockydoc-api` builds it, minus the
/// file-backed store and the HTTP listener.
pub fn test_app() -> Router {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let provider: Arc<dyn CatalogProvider> =
        Arc::new(FixtureCatalog::new().expect("catalog fixtures are valid"));

    let directory = Arc::new(DirectoryService::new(provider.clone()));
    let contexts = Arc::new(BookingContexts::new(provider.clone()));
    let sessions = Arc::new(SessionService::new(store.clone()));
    let checkout = Arc::new(CheckoutService::new(provider, store));

    Router::new()
        .route("/", get(|| async { "PockyDoc API is running!" }))
        .nest("/catalog", catalog_routes(directory))
        .nest("/booking", booking_routes(contexts))
        .nest("/session", session_routes(sessions.clone()))
        .nest("/checkout", checkout_routes(checkout.clone(), sessions.clone()))
        .nest("/appointments", appointments_routes(checkout, sessions))
}
