//! Cash ledger repository.
//!
//! Runs the cash report SQL templates against `saldo_contabil` and maps the
//! rows into typed movements. A pooled connection is checked out for each
//! statement and returned when the statement completes.

use std::sync::Arc;

use caixa_core::cash::{
    AccountMovement, CashLedgerRepository, LedgerMovement, MonthlyMovement, UnitMovement,
    UnitOption,
};
use caixa_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, FromQueryResult};
use tracing::{debug, warn};

use crate::templates::{SqlTemplateStore, TemplateArgs, TemplateError};

/// Logical names of the SQL templates used by the cash reports.
pub mod template_names {
    /// Distinct fiscal years.
    pub const YEARS: &str = "anos_disponiveis";
    /// Units of a year.
    pub const UNITS: &str = "ugs_por_ano";
    /// Per-account totals of a unit.
    pub const UNIT_SUMMARY: &str = "caixa_resumo_ug";
    /// Ledger detail rows.
    pub const DETAIL: &str = "caixa_detalhes";
    /// Per-month totals of the cash range.
    pub const MONTHLY_TREND: &str = "caixa_evolucao_mensal";
    /// Per-unit totals up to a month.
    pub const UNIT_RANKING: &str = "caixa_ranking_ugs";

    /// Every template the repository needs.
    pub const ALL: [&str; 6] = [
        YEARS,
        UNITS,
        UNIT_SUMMARY,
        DETAIL,
        MONTHLY_TREND,
        UNIT_RANKING,
    ];
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(name) => Self::TemplateNotFound(name),
            other => Self::DataAccess(other.to_string()),
        }
    }
}

fn db_error(err: &DbErr) -> AppError {
    AppError::data_access(err.to_string())
}

/// Months outside 1-12 are logged and the row is skipped.
fn month_from_db(month: i32) -> Option<u32> {
    let valid = u32::try_from(month).ok().filter(|m| (1..=12).contains(m));
    if valid.is_none() {
        warn!(month, "Skipping ledger row with invalid month");
    }
    valid
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, FromQueryResult)]
struct YearRow {
    coexercicio: i32,
}

#[derive(Debug, FromQueryResult)]
struct UnitRow {
    coug: i64,
    noug: String,
}

#[derive(Debug, FromQueryResult)]
struct AccountRow {
    cocontacontabil: String,
    nocontacontabil: Option<String>,
    total_debito: Decimal,
    total_credito: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct LedgerRow {
    coexercicio: i32,
    coug: i64,
    noug: Option<String>,
    cocontacontabil: String,
    nocontacontabil: Option<String>,
    inmes: i32,
    vadebito: Decimal,
    vacredito: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct MonthRow {
    inmes: i32,
    vadebito: Decimal,
    vacredito: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct UnitTotalRow {
    coug: i64,
    noug: Option<String>,
    vadebito: Decimal,
    vacredito: Decimal,
}

impl LedgerRow {
    fn into_movement(self) -> Option<LedgerMovement> {
        Some(LedgerMovement {
            year: self.coexercicio,
            unit_code: self.coug,
            unit_name: self.noug,
            account_code: self.cocontacontabil,
            account_name: self.nocontacontabil,
            month: month_from_db(self.inmes)?,
            debit: self.vadebito,
            credit: self.vacredito,
        })
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Repository for cash ledger queries.
#[derive(Debug)]
pub struct CashRepository {
    db: DatabaseConnection,
    templates: Arc<SqlTemplateStore>,
}

impl CashRepository {
    /// Creates a new cash repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, templates: Arc<SqlTemplateStore>) -> Self {
        Self { db, templates }
    }

    /// Verifies every report template can be read.
    ///
    /// # Errors
    ///
    /// Returns the first template that fails to load.
    pub async fn check_templates(&self) -> AppResult<()> {
        for name in template_names::ALL {
            self.templates.load(name).await?;
        }
        Ok(())
    }

    /// Hands back the connection, e.g. to read a mock transaction log.
    #[cfg(test)]
    pub(crate) fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    async fn fetch<T: FromQueryResult>(&self, name: &str, args: TemplateArgs) -> AppResult<Vec<T>> {
        let prepared = self.templates.prepare(name, args).await?;
        debug!(template = %prepared.name, params = prepared.params.len(), "Running SQL template");
        let statement = prepared.into_statement()?;

        T::find_by_statement(statement)
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))
    }
}

impl CashLedgerRepository for CashRepository {
    async fn available_years(&self) -> AppResult<Vec<i32>> {
        let rows: Vec<YearRow> = self
            .fetch(template_names::YEARS, TemplateArgs::new())
            .await?;
        Ok(rows.into_iter().map(|r| r.coexercicio).collect())
    }

    async fn units(&self, year: i32) -> AppResult<Vec<UnitOption>> {
        let rows: Vec<UnitRow> = self
            .fetch(template_names::UNITS, TemplateArgs::new().bind("ano", year))
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| UnitOption {
                code: r.coug,
                name: r.noug,
            })
            .collect())
    }

    async fn unit_account_movements(&self, year: i32, unit: i64) -> AppResult<Vec<AccountMovement>> {
        let args = TemplateArgs::new()
            .bind("ano", year)
            .filter("AND coug = :ug", "ug", Some(unit));
        let rows: Vec<AccountRow> = self.fetch(template_names::UNIT_SUMMARY, args).await?;

        Ok(rows
            .into_iter()
            .map(|r| AccountMovement {
                account_code: r.cocontacontabil,
                account_name: r.nocontacontabil,
                debit: r.total_debito,
                credit: r.total_credito,
            })
            .collect())
    }

    async fn ledger_movements(
        &self,
        year: i32,
        month_ceiling: u32,
        limit: u64,
    ) -> AppResult<Vec<LedgerMovement>> {
        let args = TemplateArgs::new()
            .bind("ano", year)
            .bind("mes_limite", i32::try_from(month_ceiling).unwrap_or(12))
            .bind("limite", i64::try_from(limit).unwrap_or(i64::MAX));
        let rows: Vec<LedgerRow> = self.fetch(template_names::DETAIL, args).await?;

        Ok(rows.into_iter().filter_map(LedgerRow::into_movement).collect())
    }

    async fn monthly_movements(&self, year: i32) -> AppResult<Vec<MonthlyMovement>> {
        let rows: Vec<MonthRow> = self
            .fetch(
                template_names::MONTHLY_TREND,
                TemplateArgs::new().bind("ano", year),
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                Some(MonthlyMovement {
                    month: month_from_db(r.inmes)?,
                    debit: r.vadebito,
                    credit: r.vacredito,
                })
            })
            .collect())
    }

    async fn unit_movements(&self, year: i32, month_ceiling: u32) -> AppResult<Vec<UnitMovement>> {
        let args = TemplateArgs::new()
            .bind("ano", year)
            .bind("mes_limite", i32::try_from(month_ceiling).unwrap_or(12));
        let rows: Vec<UnitTotalRow> = self.fetch(template_names::UNIT_RANKING, args).await?;

        Ok(rows
            .into_iter()
            .map(|r| UnitMovement {
                unit_code: r.coug,
                unit_name: r.noug,
                debit: r.vadebito,
                credit: r.vacredito,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "cash_tests.rs"]
mod tests;
