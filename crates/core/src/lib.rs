//! Core business logic for Caixa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All report types, derivation rules and the reporting service live here; the
//! ledger itself is reached through the `CashLedgerRepository` trait.
//!
//! # Modules
//!
//! - `cash` - Cash and cash-equivalent balances, trend and ranking

pub mod cash;
