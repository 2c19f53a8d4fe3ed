//! Filter option routes feeding the dashboard's year and unit selectors.

use std::convert::identity;

use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use caixa_core::cash::CashLedgerRepository;

use crate::{AppState, extractors::CashQuery, response::respond};

/// Creates the filter option routes.
pub fn routes<R: CashLedgerRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/filtros/anos", get(list_years::<R>))
        .route("/api/filtros/ugs", get(list_units::<R>))
}

/// GET /api/filtros/anos
async fn list_years<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Response {
    respond(state.cash.list_available_years().await, identity)
}

/// GET /api/filtros/ugs?ano=
async fn list_units<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<CashQuery>,
) -> Response {
    respond(state.cash.list_units(query.ano).await, identity)
}
