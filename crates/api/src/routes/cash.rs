//! Cash and cash-equivalent report routes.

use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use caixa_core::cash::{
    AccountSummary, BalanceRecord, BalanceTotals, CashDetail, CashLedgerRepository,
    DetailFilters, MonthlyTrend, TrendPoint, UnitRanking, UnitRankingReport, UnitSummary,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{AppState, extractors::CashQuery, response::respond};

/// Creates the cash report routes.
pub fn routes<R: CashLedgerRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/caixa/resumo_ug", get(get_unit_summary::<R>))
        .route("/api/caixa/detalhes", get(get_detail::<R>))
        .route("/api/caixa/evolucao_mensal", get(get_monthly_trend::<R>))
        .route("/api/caixa/top_ugs", get(get_top_units::<R>))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the per-unit summary.
#[derive(Debug, Serialize)]
pub struct UnitSummaryResponse {
    /// Always true.
    pub sucesso: bool,
    /// Fiscal year.
    pub ano: i32,
    /// Unit code.
    pub ug: i64,
    /// Per-account rows.
    pub dados: Vec<AccountSummary>,
    /// Totals with prior-year comparison.
    pub totais: UnitSummaryTotals,
}

/// Totals of the per-unit summary.
#[derive(Debug, Serialize)]
pub struct UnitSummaryTotals {
    /// Current-year totals.
    #[serde(flatten)]
    pub atual: BalanceTotals,
    /// Prior-year balance.
    #[serde(rename = "SALDO_ANTERIOR")]
    pub saldo_anterior: Decimal,
    /// Percentage change of the balance.
    pub variacao_percentual: Decimal,
}

/// Response for the ledger detail.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    /// Always true.
    pub sucesso: bool,
    /// Ledger rows.
    pub dados: Vec<BalanceRecord>,
    /// Totals over the returned rows.
    pub totais: BalanceTotals,
    /// Filters applied after defaults.
    pub filtros: DetailFilters,
    /// Number of rows returned.
    pub total_registros: usize,
}

/// Response for the monthly trend.
#[derive(Debug, Serialize)]
pub struct MonthlyTrendResponse {
    /// Always true.
    pub sucesso: bool,
    /// Fiscal year.
    pub ano: i32,
    /// Points in month order.
    pub dados: Vec<TrendPoint>,
    /// Month labels, for chart axes.
    pub meses: Vec<String>,
    /// Per-month values.
    pub valores: Vec<Decimal>,
    /// Running totals.
    pub acumulado: Vec<Decimal>,
    /// Cumulative value at the last month.
    pub total: Decimal,
}

/// Response for the unit ranking.
#[derive(Debug, Serialize)]
pub struct UnitRankingResponse {
    /// Always true.
    pub sucesso: bool,
    /// Fiscal year.
    pub ano: i32,
    /// Last month included.
    pub mes: u32,
    /// Ranked units.
    pub dados: Vec<UnitRanking>,
}

impl From<UnitSummary> for UnitSummaryResponse {
    fn from(summary: UnitSummary) -> Self {
        Self {
            sucesso: true,
            ano: summary.year,
            ug: summary.unit,
            dados: summary.accounts,
            totais: UnitSummaryTotals {
                atual: summary.totals,
                saldo_anterior: summary.prior_totals.balance,
                variacao_percentual: summary.variation_percent,
            },
        }
    }
}

impl From<CashDetail> for DetailResponse {
    fn from(detail: CashDetail) -> Self {
        Self {
            sucesso: true,
            total_registros: detail.records.len(),
            dados: detail.records,
            totais: detail.totals,
            filtros: detail.filters,
        }
    }
}

impl From<MonthlyTrend> for MonthlyTrendResponse {
    fn from(trend: MonthlyTrend) -> Self {
        Self {
            sucesso: true,
            ano: trend.year,
            meses: trend.points.iter().map(|p| p.rotulo.clone()).collect(),
            valores: trend.points.iter().map(|p| p.valor).collect(),
            acumulado: trend.points.iter().map(|p| p.acumulado).collect(),
            total: trend.total(),
            dados: trend.points,
        }
    }
}

impl From<UnitRankingReport> for UnitRankingResponse {
    fn from(report: UnitRankingReport) -> Self {
        Self {
            sucesso: true,
            ano: report.year,
            mes: report.month_ceiling,
            dados: report.entries,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/caixa/resumo_ug?ano=&ug=
async fn get_unit_summary<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<CashQuery>,
) -> Response {
    respond(
        state.cash.summarize_by_unit(query.ano, query.ug).await,
        UnitSummaryResponse::from,
    )
}

/// GET /api/caixa/detalhes?ano=&mes=&limite=
async fn get_detail<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<CashQuery>,
) -> Response {
    respond(
        state.cash.detail(query.ano, query.mes, query.limite).await,
        DetailResponse::from,
    )
}

/// GET /api/caixa/evolucao_mensal?ano=
async fn get_monthly_trend<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<CashQuery>,
) -> Response {
    respond(
        state.cash.monthly_trend(query.ano).await,
        MonthlyTrendResponse::from,
    )
}

/// GET /api/caixa/top_ugs?ano=&mes=&limite=
async fn get_top_units<R: CashLedgerRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(query): Query<CashQuery>,
) -> Response {
    let limit = query.limite.map(|l| usize::try_from(l).unwrap_or(usize::MAX));
    respond(
        state.cash.top_units(query.ano, query.mes, limit).await,
        UnitRankingResponse::from,
    )
}
