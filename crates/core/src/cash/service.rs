//! Cash balance reporting service.

use std::future::Future;
use std::sync::Arc;

use caixa_shared::{AppError, AppResult, ReportsConfig};
use chrono::{Datelike, Local, NaiveDate};
use tracing::{error, info, instrument};

use super::calculator::CashCalculator;
use super::types::{
    AccountMovement, CashDetail, DetailFilters, LedgerMovement, MonthlyMovement, MonthlyTrend,
    UnitMovement, UnitOption, UnitRankingReport, UnitSummary,
};

/// Repository trait for ledger balance queries.
///
/// This trait is implemented by the db crate to run the SQL templates.
pub trait CashLedgerRepository: Send + Sync {
    /// Distinct fiscal years, most recent first.
    fn available_years(&self) -> impl Future<Output = AppResult<Vec<i32>>> + Send;

    /// Distinct units with movement in a year, ordered by name.
    fn units(&self, year: i32) -> impl Future<Output = AppResult<Vec<UnitOption>>> + Send;

    /// Per-account totals of one unit for a year.
    fn unit_account_movements(
        &self,
        year: i32,
        unit: i64,
    ) -> impl Future<Output = AppResult<Vec<AccountMovement>>> + Send;

    /// Ledger rows up to a month, month descending then account and unit.
    fn ledger_movements(
        &self,
        year: i32,
        month_ceiling: u32,
        limit: u64,
    ) -> impl Future<Output = AppResult<Vec<LedgerMovement>>> + Send;

    /// Per-month totals of the cash account range for a year.
    fn monthly_movements(
        &self,
        year: i32,
    ) -> impl Future<Output = AppResult<Vec<MonthlyMovement>>> + Send;

    /// Per-unit totals up to a month.
    fn unit_movements(
        &self,
        year: i32,
        month_ceiling: u32,
    ) -> impl Future<Output = AppResult<Vec<UnitMovement>>> + Send;
}

/// Query defaults applied when the caller leaves a filter out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefaults {
    /// Detail rows when no limit is given.
    pub detail_limit: u64,
    /// Upper bound for the detail limit.
    pub max_detail_limit: u64,
    /// Ranking entries when no limit is given.
    pub ranking_limit: usize,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self::from(&ReportsConfig::default())
    }
}

impl From<&ReportsConfig> for ReportDefaults {
    fn from(config: &ReportsConfig) -> Self {
        Self {
            detail_limit: config.detail_limit,
            max_detail_limit: config.max_detail_limit.max(1),
            ranking_limit: config.ranking_limit,
        }
    }
}

/// Service producing the cash and cash-equivalent reports.
pub struct CashService<R: CashLedgerRepository> {
    repo: Arc<R>,
    defaults: ReportDefaults,
    today: Option<NaiveDate>,
}

impl<R: CashLedgerRepository> CashService<R> {
    /// Create a new cash service.
    #[must_use]
    pub fn new(repo: Arc<R>, defaults: ReportDefaults) -> Self {
        Self {
            repo,
            defaults,
            today: None,
        }
    }

    /// Pins the date used for year/month defaults.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Distinct fiscal years, most recent first.
    #[instrument(skip(self))]
    pub async fn list_available_years(&self) -> AppResult<Vec<i32>> {
        let mut years = self
            .repo
            .available_years()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list available years"))?;

        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    /// Units with movement in `year`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without touching the repository when
    /// `year` is missing.
    #[instrument(skip(self))]
    pub async fn list_units(&self, year: Option<i32>) -> AppResult<Vec<UnitOption>> {
        let year = require_year(year)?;

        self.repo
            .units(year)
            .await
            .inspect_err(|e| error!(error = %e, year, "Failed to list units"))
    }

    /// Per-account summary of one unit, compared with the prior year.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without touching the repository when
    /// `year` or `unit` is missing.
    #[instrument(skip(self))]
    pub async fn summarize_by_unit(
        &self,
        year: Option<i32>,
        unit: Option<i64>,
    ) -> AppResult<UnitSummary> {
        let (year, unit) = match (year, unit) {
            (Some(year), Some(unit)) => (year, unit),
            _ => {
                return Err(AppError::validation(
                    "Parâmetros 'ano' e 'ug' são obrigatórios",
                ));
            }
        };
        info!(year, unit, "Building unit summary");

        let current = self
            .repo
            .unit_account_movements(year, unit)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to load unit summary"))?;
        let prior = match year.checked_sub(1) {
            Some(prior_year) => self
                .repo
                .unit_account_movements(prior_year, unit)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to load prior-year unit summary"))?,
            None => Vec::new(),
        };

        let totals = CashCalculator::totals(&current);
        let prior_totals = CashCalculator::totals(&prior);
        let accounts = CashCalculator::summarize_accounts(current, &prior);

        Ok(UnitSummary {
            year,
            unit,
            accounts,
            totals,
            prior_totals,
            variation_percent: CashCalculator::variation_percent(
                totals.balance,
                prior_totals.balance,
            ),
        })
    }

    /// Most recent ledger rows up to a month.
    ///
    /// Year and month default to today; the limit defaults to the configured
    /// value and is clamped to `1..=max_detail_limit`.
    #[instrument(skip(self))]
    pub async fn detail(
        &self,
        year: Option<i32>,
        month_ceiling: Option<u32>,
        limit: Option<u64>,
    ) -> AppResult<CashDetail> {
        let today = self.today();
        let filters = DetailFilters {
            ano: year.unwrap_or_else(|| today.year()),
            mes: valid_month(month_ceiling).unwrap_or_else(|| today.month()),
            limite: limit
                .unwrap_or(self.defaults.detail_limit)
                .clamp(1, self.defaults.max_detail_limit),
        };

        let rows = self
            .repo
            .ledger_movements(filters.ano, filters.mes, filters.limite)
            .await
            .inspect_err(|e| error!(error = %e, ?filters, "Failed to load cash detail"))?;

        let records: Vec<_> = rows
            .into_iter()
            .take(usize::try_from(filters.limite).unwrap_or(usize::MAX))
            .map(CashCalculator::derive_record)
            .collect();
        let totals = CashCalculator::totals(&records);

        Ok(CashDetail {
            filters,
            records,
            totals,
        })
    }

    /// Month-by-month movement of the cash account range with running total.
    #[instrument(skip(self))]
    pub async fn monthly_trend(&self, year: Option<i32>) -> AppResult<MonthlyTrend> {
        let year = year.unwrap_or_else(|| self.today().year());

        let movements = self
            .repo
            .monthly_movements(year)
            .await
            .inspect_err(|e| error!(error = %e, year, "Failed to load monthly trend"))?;

        Ok(MonthlyTrend {
            year,
            points: CashCalculator::accumulate_trend(&movements),
        })
    }

    /// Units ranked by balance up to a month.
    #[instrument(skip(self))]
    pub async fn top_units(
        &self,
        year: Option<i32>,
        month_ceiling: Option<u32>,
        limit: Option<usize>,
    ) -> AppResult<UnitRankingReport> {
        let today = self.today();
        let year = year.unwrap_or_else(|| today.year());
        let month_ceiling = valid_month(month_ceiling).unwrap_or_else(|| today.month());
        let limit = limit.unwrap_or(self.defaults.ranking_limit);

        let movements = self
            .repo
            .unit_movements(year, month_ceiling)
            .await
            .inspect_err(|e| error!(error = %e, year, month_ceiling, "Failed to load unit ranking"))?;

        Ok(UnitRankingReport {
            year,
            month_ceiling,
            entries: CashCalculator::rank_units(movements, limit),
        })
    }
}

fn require_year(year: Option<i32>) -> AppResult<i32> {
    year.ok_or_else(|| AppError::validation("Parâmetro 'ano' é obrigatório"))
}

/// Months outside 1-12 are treated as absent.
fn valid_month(month: Option<u32>) -> Option<u32> {
    month.filter(|m| (1..=12).contains(m))
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
