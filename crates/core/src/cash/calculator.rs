//! Balance derivation rules.
//!
//! Everything here is pure arithmetic over loaded rows: no IO, no clock.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use super::types::{
    AccountMovement, AccountSummary, Amounts, BalanceRecord, BalanceSign, BalanceTotals,
    LedgerMovement, MonthlyMovement, TrendPoint, UnitMovement, UnitRanking,
};

/// Short Portuguese month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Stateless calculator for cash report figures.
pub struct CashCalculator;

impl CashCalculator {
    /// Balance of a debit/credit pair.
    #[must_use]
    pub fn balance(debit: Decimal, credit: Decimal) -> Decimal {
        debit - credit
    }

    /// Attaches balance and sign to a ledger row.
    #[must_use]
    pub fn derive_record(movement: LedgerMovement) -> BalanceRecord {
        let balance = Self::balance(movement.debit, movement.credit);
        BalanceRecord {
            year: movement.year,
            unit_code: movement.unit_code,
            unit_name: movement.unit_name,
            account_code: movement.account_code,
            account_name: movement.account_name,
            month: movement.month,
            debit: movement.debit,
            credit: movement.credit,
            balance,
            sign: BalanceSign::of(balance),
        }
    }

    /// Sums debits and credits and derives the overall balance.
    pub fn totals<'a, T, I>(items: I) -> BalanceTotals
    where
        T: Amounts + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let (debit, credit) = items
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(d, c), item| {
                (d + item.debit(), c + item.credit())
            });
        let balance = Self::balance(debit, credit);

        BalanceTotals {
            debit,
            credit,
            balance,
            sign: BalanceSign::of(balance),
        }
    }

    /// Percentage change from `prior` to `current`, rounded to 2 places.
    ///
    /// The prior magnitude is the base, so a move from -100 to -50 is +50%.
    /// A zero prior yields zero.
    #[must_use]
    pub fn variation_percent(current: Decimal, prior: Decimal) -> Decimal {
        if prior.is_zero() {
            return Decimal::ZERO;
        }
        ((current - prior) / prior.abs() * Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Builds the per-account summary, comparing each account with its
    /// prior-year balance.
    #[must_use]
    pub fn summarize_accounts(
        current: Vec<AccountMovement>,
        prior: &[AccountMovement],
    ) -> Vec<AccountSummary> {
        let mut prior_by_account: HashMap<&str, Decimal> = HashMap::new();
        for movement in prior {
            *prior_by_account
                .entry(movement.account_code.as_str())
                .or_default() += Self::balance(movement.debit, movement.credit);
        }

        current
            .into_iter()
            .map(|movement| {
                let balance = Self::balance(movement.debit, movement.credit);
                let prior_balance = prior_by_account
                    .get(movement.account_code.as_str())
                    .copied()
                    .unwrap_or_default();

                AccountSummary {
                    variation_percent: Self::variation_percent(balance, prior_balance),
                    account_code: movement.account_code,
                    account_name: movement.account_name,
                    debit: movement.debit,
                    credit: movement.credit,
                    balance,
                    sign: BalanceSign::of(balance),
                    prior_balance,
                }
            })
            .collect()
    }

    /// Groups movements by month and accumulates them in month order.
    ///
    /// Points run from January to the last month with data; months without
    /// movement contribute zero.
    #[must_use]
    pub fn accumulate_trend(movements: &[MonthlyMovement]) -> Vec<TrendPoint> {
        let mut by_month: BTreeMap<u32, Decimal> = BTreeMap::new();
        for movement in movements.iter().filter(|m| (1..=12).contains(&m.month)) {
            *by_month.entry(movement.month).or_default() +=
                Self::balance(movement.debit, movement.credit);
        }

        let Some(&last_month) = by_month.keys().next_back() else {
            return Vec::new();
        };

        let mut cumulative = Decimal::ZERO;
        (1..=last_month)
            .zip(MONTH_LABELS)
            .map(|(month, label)| {
                let value = by_month.get(&month).copied().unwrap_or_default();
                cumulative += value;
                TrendPoint {
                    mes: month,
                    rotulo: label.to_string(),
                    valor: value,
                    acumulado: cumulative,
                }
            })
            .collect()
    }

    /// Sums balance per unit and ranks units by descending balance.
    ///
    /// Ties keep ascending unit-code order. The result holds at most `limit`
    /// entries ranked 1, 2, 3, ...
    #[must_use]
    pub fn rank_units(movements: Vec<UnitMovement>, limit: usize) -> Vec<UnitRanking> {
        let mut by_unit: BTreeMap<i64, UnitMovement> = BTreeMap::new();
        for movement in movements {
            by_unit
                .entry(movement.unit_code)
                .and_modify(|unit| {
                    unit.debit += movement.debit;
                    unit.credit += movement.credit;
                    if unit.unit_name.is_none() {
                        unit.unit_name.clone_from(&movement.unit_name);
                    }
                })
                .or_insert(movement);
        }

        let mut units: Vec<UnitMovement> = by_unit.into_values().collect();
        units.sort_by_key(|unit| Reverse(Self::balance(unit.debit, unit.credit)));

        units
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, unit)| {
                let balance = Self::balance(unit.debit, unit.credit);
                UnitRanking {
                    rank: index + 1,
                    unit_code: unit.unit_code,
                    unit_name: unit.unit_name,
                    debit: unit.debit,
                    credit: unit.credit,
                    balance,
                    sign: BalanceSign::of(balance),
                }
            })
            .collect()
    }
}
