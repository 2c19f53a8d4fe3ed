//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the cash dashboard
//! - Lenient query-string extraction
//! - The `sucesso`/`erro` response envelope

pub mod extractors;
pub mod response;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use caixa_core::cash::{CashLedgerRepository, CashService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState<R: CashLedgerRepository> {
    /// Cash report service.
    pub cash: Arc<CashService<R>>,
}

impl<R: CashLedgerRepository> AppState<R> {
    /// Wraps a service into shareable state.
    #[must_use]
    pub fn new(cash: CashService<R>) -> Self {
        Self {
            cash: Arc::new(cash),
        }
    }
}

impl<R: CashLedgerRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            cash: Arc::clone(&self.cash),
        }
    }
}

/// Creates the main application router.
///
/// When `static_dir` is given, unmatched paths are served from it so the
/// dashboard and its API share one origin.
pub fn create_router<R: CashLedgerRepository + 'static>(
    state: AppState<R>,
    static_dir: Option<&Path>,
) -> Router {
    let mut router = routes::api_routes::<R>();
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
