//! API route definitions.

use axum::Router;
use caixa_core::cash::CashLedgerRepository;

use crate::AppState;

pub mod cash;
pub mod filters;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes<R: CashLedgerRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .merge(health::routes::<R>())
        .merge(filters::routes::<R>())
        .merge(cash::routes::<R>())
}
