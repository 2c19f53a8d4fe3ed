use std::sync::Mutex;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::cash::BalanceSign;

/// Mock repository recording every call it receives.
#[derive(Default)]
struct MockCashRepository {
    calls: Mutex<Vec<String>>,
    years: Vec<i32>,
    units: Vec<UnitOption>,
    accounts: Vec<(i32, AccountMovement)>,
    ledger: Vec<LedgerMovement>,
    monthly: Vec<MonthlyMovement>,
    unit_movements: Vec<UnitMovement>,
    failure: Option<AppError>,
}

impl MockCashRepository {
    fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CashLedgerRepository for MockCashRepository {
    async fn available_years(&self) -> AppResult<Vec<i32>> {
        self.record("available_years".to_string())?;
        Ok(self.years.clone())
    }

    async fn units(&self, year: i32) -> AppResult<Vec<UnitOption>> {
        self.record(format!("units({year})"))?;
        Ok(self.units.clone())
    }

    async fn unit_account_movements(&self, year: i32, unit: i64) -> AppResult<Vec<AccountMovement>> {
        self.record(format!("unit_account_movements({year}, {unit})"))?;
        Ok(self
            .accounts
            .iter()
            .filter(|(y, _)| *y == year)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn ledger_movements(
        &self,
        year: i32,
        month_ceiling: u32,
        limit: u64,
    ) -> AppResult<Vec<LedgerMovement>> {
        self.record(format!("ledger_movements({year}, {month_ceiling}, {limit})"))?;
        Ok(self.ledger.clone())
    }

    async fn monthly_movements(&self, year: i32) -> AppResult<Vec<MonthlyMovement>> {
        self.record(format!("monthly_movements({year})"))?;
        Ok(self.monthly.clone())
    }

    async fn unit_movements(&self, year: i32, month_ceiling: u32) -> AppResult<Vec<UnitMovement>> {
        self.record(format!("unit_movements({year}, {month_ceiling})"))?;
        Ok(self.unit_movements.clone())
    }
}

fn service(repo: MockCashRepository) -> (Arc<MockCashRepository>, CashService<MockCashRepository>) {
    let repo = Arc::new(repo);
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let service = CashService::new(repo.clone(), ReportDefaults::default()).with_today(today);
    (repo, service)
}

fn account(code: &str, debit: Decimal, credit: Decimal) -> AccountMovement {
    AccountMovement {
        account_code: code.to_string(),
        account_name: Some(format!("Conta {code}")),
        debit,
        credit,
    }
}

fn ledger(month: u32, debit: Decimal, credit: Decimal) -> LedgerMovement {
    LedgerMovement {
        year: 2025,
        unit_code: 110_001,
        unit_name: Some("Secretaria da Fazenda".to_string()),
        account_code: "111110100".to_string(),
        account_name: Some("Caixa".to_string()),
        month,
        debit,
        credit,
    }
}

#[tokio::test]
async fn test_list_available_years_sorted_descending() {
    let (_, service) = service(MockCashRepository {
        years: vec![2023, 2025, 2024, 2025],
        ..Default::default()
    });

    let years = service.list_available_years().await.unwrap();
    assert_eq!(years, vec![2025, 2024, 2023]);
}

#[tokio::test]
async fn test_list_units_requires_year() {
    let (repo, service) = service(MockCashRepository::default());

    let err = service.list_units(None).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_list_units_passes_year() {
    let (repo, service) = service(MockCashRepository {
        units: vec![UnitOption {
            code: 110_001,
            name: "Secretaria da Fazenda".to_string(),
        }],
        ..Default::default()
    });

    let units = service.list_units(Some(2024)).await.unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(repo.calls(), vec!["units(2024)"]);
}

#[tokio::test]
async fn test_summarize_by_unit_requires_year_and_unit() {
    let (repo, service) = service(MockCashRepository::default());

    for (year, unit) in [(None, Some(1)), (Some(2024), None), (None, None)] {
        let err = service.summarize_by_unit(year, unit).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_summarize_by_unit_totals_and_variation() {
    let (repo, service) = service(MockCashRepository {
        accounts: vec![
            (2024, account("111110100", dec!(100), dec!(40))),
            (2024, account("111110200", dec!(10), dec!(10))),
            (2023, account("111110100", dec!(50), dec!(20))),
        ],
        ..Default::default()
    });

    let summary = service.summarize_by_unit(Some(2024), Some(7)).await.unwrap();

    assert_eq!(summary.totals.debit, dec!(110));
    assert_eq!(summary.totals.credit, dec!(50));
    assert_eq!(summary.totals.balance, dec!(60));
    assert_eq!(summary.totals.sign, BalanceSign::Debit);
    assert_eq!(summary.prior_totals.balance, dec!(30));
    assert_eq!(summary.variation_percent, dec!(100));
    assert_eq!(summary.accounts[0].variation_percent, dec!(100));
    assert_eq!(
        repo.calls(),
        vec![
            "unit_account_movements(2024, 7)",
            "unit_account_movements(2023, 7)"
        ]
    );
}

#[tokio::test]
async fn test_summarize_by_unit_without_prior_year_has_zero_variation() {
    let (_, service) = service(MockCashRepository {
        accounts: vec![(2024, account("111110100", dec!(500), dec!(100)))],
        ..Default::default()
    });

    let summary = service.summarize_by_unit(Some(2024), Some(7)).await.unwrap();

    assert_eq!(summary.variation_percent, Decimal::ZERO);
    assert_eq!(summary.prior_totals.balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_summarize_by_unit_at_minimum_year_skips_prior_year() {
    let (repo, service) = service(MockCashRepository {
        accounts: vec![(i32::MIN, account("111110100", dec!(5), dec!(2)))],
        ..Default::default()
    });

    let summary = service
        .summarize_by_unit(Some(i32::MIN), Some(1))
        .await
        .unwrap();

    assert_eq!(summary.totals.balance, dec!(3));
    assert_eq!(summary.prior_totals.balance, Decimal::ZERO);
    assert_eq!(summary.variation_percent, Decimal::ZERO);
    assert_eq!(
        repo.calls(),
        vec![format!("unit_account_movements({}, 1)", i32::MIN)]
    );
}

#[tokio::test]
async fn test_detail_defaults_to_today_and_configured_limit() {
    let (repo, service) = service(MockCashRepository {
        ledger: vec![ledger(6, dec!(100), dec!(40)), ledger(5, dec!(10), dec!(10))],
        ..Default::default()
    });

    let detail = service.detail(None, None, None).await.unwrap();

    assert_eq!(
        detail.filters,
        DetailFilters {
            ano: 2025,
            mes: 6,
            limite: 100
        }
    );
    assert_eq!(repo.calls(), vec!["ledger_movements(2025, 6, 100)"]);
    assert_eq!(detail.records[0].balance, dec!(60));
    assert_eq!(detail.records[1].balance, dec!(0));
    assert_eq!(detail.totals.balance, dec!(60));
}

#[tokio::test]
async fn test_detail_clamps_limit_and_ignores_invalid_month() {
    let (repo, service) = service(MockCashRepository::default());

    service.detail(Some(2022), Some(13), Some(50_000)).await.unwrap();
    service.detail(Some(2022), Some(3), Some(0)).await.unwrap();

    assert_eq!(
        repo.calls(),
        vec![
            "ledger_movements(2022, 6, 1000)",
            "ledger_movements(2022, 3, 1)"
        ]
    );
}

#[tokio::test]
async fn test_detail_never_returns_more_than_limit() {
    let (_, service) = service(MockCashRepository {
        ledger: (1..=5).map(|m| ledger(m, dec!(1), dec!(0))).collect(),
        ..Default::default()
    });

    let detail = service.detail(None, None, Some(2)).await.unwrap();

    assert_eq!(detail.records.len(), 2);
    assert_eq!(detail.totals.debit, dec!(2));
}

#[tokio::test]
async fn test_monthly_trend_accumulates() {
    let (repo, service) = service(MockCashRepository {
        monthly: vec![
            MonthlyMovement {
                month: 1,
                debit: dec!(100),
                credit: dec!(0),
            },
            MonthlyMovement {
                month: 2,
                debit: dec!(0),
                credit: dec!(30),
            },
        ],
        ..Default::default()
    });

    let trend = service.monthly_trend(None).await.unwrap();

    assert_eq!(trend.year, 2025);
    assert_eq!(trend.points.len(), 2);
    assert_eq!(trend.points[1].acumulado, dec!(70));
    assert_eq!(trend.total(), dec!(70));
    assert_eq!(repo.calls(), vec!["monthly_movements(2025)"]);
}

#[tokio::test]
async fn test_top_units_uses_defaults() {
    let (repo, service) = service(MockCashRepository {
        unit_movements: (1..=15)
            .map(|code| UnitMovement {
                unit_code: code,
                unit_name: None,
                debit: Decimal::from(code),
                credit: Decimal::ZERO,
            })
            .collect(),
        ..Default::default()
    });

    let ranking = service.top_units(Some(2024), None, None).await.unwrap();

    assert_eq!(ranking.entries.len(), 10);
    assert_eq!(ranking.entries[0].unit_code, 15);
    assert_eq!(ranking.entries[9].rank, 10);
    assert_eq!(repo.calls(), vec!["unit_movements(2024, 6)"]);
}

#[tokio::test]
async fn test_repository_failure_is_returned_not_panicked() {
    let (_, service) = service(MockCashRepository {
        failure: Some(AppError::data_access("connection refused")),
        ..Default::default()
    });

    let err = service.detail(None, None, None).await.unwrap_err();
    assert_eq!(err, AppError::DataAccess("connection refused".to_string()));

    let err = service
        .summarize_by_unit(Some(2024), Some(1))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 200);
}
