//! Cash report data types.
//!
//! Serialized field names follow the ledger column vocabulary the dashboard
//! reads (`COEXERCICIO`, `COUG`, `SALDO`, `DC`, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Debit/credit sign indicator of a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSign {
    /// Debit-positive (balance >= 0).
    #[serde(rename = "D")]
    Debit,
    /// Credit-positive (balance < 0).
    #[serde(rename = "C")]
    Credit,
}

impl BalanceSign {
    /// Sign of a balance. Zero counts as debit.
    #[must_use]
    pub fn of(balance: Decimal) -> Self {
        if balance >= Decimal::ZERO {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

/// Anything carrying a debit and a credit total.
pub trait Amounts {
    /// Debit total.
    fn debit(&self) -> Decimal;
    /// Credit total.
    fn credit(&self) -> Decimal;
}

// ============================================================================
// Rows loaded from the ledger
// ============================================================================

/// Accounting unit available for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    /// Unit code (COUG).
    pub code: i64,
    /// Unit name (NOUG).
    pub name: String,
}

/// Debit/credit movement of one account inside a unit for a whole year.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountMovement {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: Option<String>,
    /// Debit total.
    pub debit: Decimal,
    /// Credit total.
    pub credit: Decimal,
}

/// Debit/credit movement per (year, unit, account, month).
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerMovement {
    /// Fiscal year.
    pub year: i32,
    /// Unit code.
    pub unit_code: i64,
    /// Unit name.
    pub unit_name: Option<String>,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: Option<String>,
    /// Month of year (1-12).
    pub month: u32,
    /// Debit total.
    pub debit: Decimal,
    /// Credit total.
    pub credit: Decimal,
}

/// Debit/credit movement of the cash account range for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMovement {
    /// Month of year (1-12).
    pub month: u32,
    /// Debit total.
    pub debit: Decimal,
    /// Credit total.
    pub credit: Decimal,
}

/// Debit/credit movement of one unit up to a month.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMovement {
    /// Unit code.
    pub unit_code: i64,
    /// Unit name.
    pub unit_name: Option<String>,
    /// Debit total.
    pub debit: Decimal,
    /// Credit total.
    pub credit: Decimal,
}

macro_rules! impl_amounts {
    ($($ty:ty),+ $(,)?) => {
        $(impl Amounts for $ty {
            fn debit(&self) -> Decimal {
                self.debit
            }

            fn credit(&self) -> Decimal {
                self.credit
            }
        })+
    };
}

impl_amounts!(
    AccountMovement,
    LedgerMovement,
    MonthlyMovement,
    UnitMovement,
    BalanceRecord,
    AccountSummary,
);

// ============================================================================
// Derived records
// ============================================================================

/// Ledger row with its derived balance and sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Fiscal year.
    #[serde(rename = "COEXERCICIO")]
    pub year: i32,
    /// Unit code.
    #[serde(rename = "COUG")]
    pub unit_code: i64,
    /// Unit name.
    #[serde(rename = "NOUG")]
    pub unit_name: Option<String>,
    /// Account code.
    #[serde(rename = "COCONTACONTABIL")]
    pub account_code: String,
    /// Account name.
    #[serde(rename = "NOCONTACONTABIL")]
    pub account_name: Option<String>,
    /// Month of year.
    #[serde(rename = "INMES")]
    pub month: u32,
    /// Debit total.
    #[serde(rename = "VADEBITO")]
    pub debit: Decimal,
    /// Credit total.
    #[serde(rename = "VACREDITO")]
    pub credit: Decimal,
    /// Debit minus credit.
    #[serde(rename = "SALDO")]
    pub balance: Decimal,
    /// Sign of the balance.
    #[serde(rename = "DC")]
    pub sign: BalanceSign,
}

/// One account of the per-unit summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account code.
    #[serde(rename = "COCONTACONTABIL")]
    pub account_code: String,
    /// Account name.
    #[serde(rename = "NOCONTACONTABIL")]
    pub account_name: Option<String>,
    /// Debit total.
    #[serde(rename = "TOTAL_DEBITO")]
    pub debit: Decimal,
    /// Credit total.
    #[serde(rename = "TOTAL_CREDITO")]
    pub credit: Decimal,
    /// Debit minus credit.
    #[serde(rename = "SALDO")]
    pub balance: Decimal,
    /// Sign of the balance.
    #[serde(rename = "DC")]
    pub sign: BalanceSign,
    /// Balance of the same account in the prior year.
    #[serde(rename = "SALDO_ANTERIOR")]
    pub prior_balance: Decimal,
    /// Percentage change from the prior-year balance.
    #[serde(rename = "VARIACAO_PERCENTUAL")]
    pub variation_percent: Decimal,
}

/// Aggregate debit/credit totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Sum of debits.
    #[serde(rename = "TOTAL_DEBITO")]
    pub debit: Decimal,
    /// Sum of credits.
    #[serde(rename = "TOTAL_CREDITO")]
    pub credit: Decimal,
    /// Overall balance.
    #[serde(rename = "SALDO")]
    pub balance: Decimal,
    /// Sign of the overall balance.
    #[serde(rename = "DC")]
    pub sign: BalanceSign,
}

impl Default for BalanceTotals {
    fn default() -> Self {
        Self {
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            balance: Decimal::ZERO,
            sign: BalanceSign::Debit,
        }
    }
}

/// Per-account summary of one unit for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    /// Fiscal year.
    pub year: i32,
    /// Unit code.
    pub unit: i64,
    /// Accounts with movement in the year.
    pub accounts: Vec<AccountSummary>,
    /// Totals for the year.
    pub totals: BalanceTotals,
    /// Totals for the prior year.
    pub prior_totals: BalanceTotals,
    /// Percentage change of the overall balance.
    pub variation_percent: Decimal,
}

/// Filters applied to a detail query, after defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFilters {
    /// Fiscal year.
    pub ano: i32,
    /// Last month included.
    pub mes: u32,
    /// Maximum number of rows.
    pub limite: u64,
}

/// Most recent ledger rows up to a month.
#[derive(Debug, Clone, PartialEq)]
pub struct CashDetail {
    /// Filters actually applied.
    pub filters: DetailFilters,
    /// Rows, month descending.
    pub records: Vec<BalanceRecord>,
    /// Totals over the returned rows.
    pub totals: BalanceTotals,
}

/// One month of the cash trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month of year (1-12).
    pub mes: u32,
    /// Short month label.
    pub rotulo: String,
    /// Debit minus credit for the month.
    pub valor: Decimal,
    /// Running total up to and including this month.
    pub acumulado: Decimal,
}

/// Month-by-month cash movement for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    /// Fiscal year.
    pub year: i32,
    /// Points in month order.
    pub points: Vec<TrendPoint>,
}

impl MonthlyTrend {
    /// Cumulative value at the last month, zero when empty.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.points.last().map_or(Decimal::ZERO, |p| p.acumulado)
    }
}

/// Position of a unit in the balance ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRanking {
    /// 1-based rank.
    pub rank: usize,
    /// Unit code.
    #[serde(rename = "COUG")]
    pub unit_code: i64,
    /// Unit name.
    #[serde(rename = "NOUG")]
    pub unit_name: Option<String>,
    /// Debit total.
    #[serde(rename = "VADEBITO")]
    pub debit: Decimal,
    /// Credit total.
    #[serde(rename = "VACREDITO")]
    pub credit: Decimal,
    /// Debit minus credit.
    #[serde(rename = "SALDO")]
    pub balance: Decimal,
    /// Sign of the balance.
    #[serde(rename = "DC")]
    pub sign: BalanceSign,
}

/// Ranking of units by balance.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRankingReport {
    /// Fiscal year.
    pub year: i32,
    /// Last month included.
    pub month_ceiling: u32,
    /// Ranked units, best first.
    pub entries: Vec<UnitRanking>,
}
