//! Cash and cash-equivalent balance reporting.
//!
//! This module provides the derivation rules and the service behind the
//! dashboard:
//! - Per-row balance and debit/credit sign
//! - Aggregate totals and prior-year variation
//! - Monthly trend with running total
//! - Unit ranking by balance

mod calculator;
mod service;
mod types;


pub use calculator::{CashCalculator, MONTH_LABELS};
pub use service::{CashLedgerRepository, CashService, ReportDefaults};
pub use types::*;
