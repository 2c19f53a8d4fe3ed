//! Tests for the cash repository against SeaORM's mock database and the
//! SQL templates shipped with the workspace.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Transaction, Value};

use super::*;

fn shipped_templates() -> Arc<SqlTemplateStore> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../sql");
    Arc::new(SqlTemplateStore::new(dir).with_fixed_parameters([
        ("conta_inicio", "111000000".to_string()),
        ("conta_fim", "111999999".to_string()),
    ]))
}

fn row(pairs: Vec<(&'static str, Value)>) -> BTreeMap<&'static str, Value> {
    pairs.into_iter().collect()
}

fn mock_db(rows: Vec<Vec<BTreeMap<&'static str, Value>>>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(rows)
        .into_connection()
}

async fn expected_transaction(name: &str, args: TemplateArgs) -> Transaction {
    let statement = shipped_templates()
        .prepare(name, args)
        .await
        .unwrap()
        .into_statement()
        .unwrap();
    Transaction::from_sql_and_values(
        DatabaseBackend::Postgres,
        statement.sql.as_str(),
        statement.values.map(|v| v.0).unwrap_or_default(),
    )
}

#[tokio::test]
async fn test_shipped_templates_all_load() {
    let repo = CashRepository::new(mock_db(vec![]), shipped_templates());
    repo.check_templates().await.unwrap();
}

#[tokio::test]
async fn test_available_years_maps_rows() {
    let db = mock_db(vec![vec![
        row(vec![("coexercicio", 2025.into())]),
        row(vec![("coexercicio", 2024.into())]),
    ]]);
    let repo = CashRepository::new(db, shipped_templates());

    let years = repo.available_years().await.unwrap();

    assert_eq!(years, vec![2025, 2024]);
}

#[tokio::test]
async fn test_units_binds_year() {
    let db = mock_db(vec![vec![row(vec![
        ("coug", 110_001i64.into()),
        ("noug", "Secretaria da Fazenda".into()),
    ])]]);
    let repo = CashRepository::new(db, shipped_templates());

    let units = repo.units(2024).await.unwrap();

    assert_eq!(
        units,
        vec![UnitOption {
            code: 110_001,
            name: "Secretaria da Fazenda".to_string()
        }]
    );
    assert_eq!(
        repo.into_connection().into_transaction_log(),
        vec![expected_transaction(template_names::UNITS, TemplateArgs::new().bind("ano", 2024)).await]
    );
}

#[tokio::test]
async fn test_unit_account_movements_applies_unit_filter() {
    let db = mock_db(vec![vec![row(vec![
        ("cocontacontabil", "111110100".into()),
        ("nocontacontabil", Value::String(None)),
        ("total_debito", dec!(100.50).into()),
        ("total_credito", dec!(40.25).into()),
    ])]]);
    let repo = CashRepository::new(db, shipped_templates());

    let movements = repo.unit_account_movements(2024, 110_001).await.unwrap();

    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].debit, dec!(100.50));
    assert_eq!(movements[0].credit, dec!(40.25));
    assert_eq!(movements[0].account_name, None);

    let expected = expected_transaction(
        template_names::UNIT_SUMMARY,
        TemplateArgs::new()
            .bind("ano", 2024)
            .filter("AND coug = :ug", "ug", Some(110_001i64)),
    )
    .await;
    assert_eq!(repo.into_connection().into_transaction_log(), vec![expected]);
}

#[tokio::test]
async fn test_ledger_movements_maps_typed_rows() {
    let db = mock_db(vec![vec![row(vec![
        ("coexercicio", 2025.into()),
        ("coug", 110_001i64.into()),
        ("noug", "Secretaria da Fazenda".into()),
        ("cocontacontabil", "111110100".into()),
        ("nocontacontabil", "Caixa".into()),
        ("inmes", 6.into()),
        ("vadebito", dec!(100).into()),
        ("vacredito", dec!(40).into()),
    ])]]);
    let repo = CashRepository::new(db, shipped_templates());

    let rows = repo.ledger_movements(2025, 6, 100).await.unwrap();

    assert_eq!(rows[0].month, 6);
    assert_eq!(rows[0].unit_name.as_deref(), Some("Secretaria da Fazenda"));
    assert_eq!(rows[0].debit, dec!(100));
}

#[tokio::test]
async fn test_monthly_rows_with_invalid_month_are_skipped() {
    let db = mock_db(vec![vec![
        row(vec![
            ("inmes", 0.into()),
            ("vadebito", dec!(7).into()),
            ("vacredito", dec!(0).into()),
        ]),
        row(vec![
            ("inmes", 1.into()),
            ("vadebito", dec!(10).into()),
            ("vacredito", dec!(4).into()),
        ]),
        row(vec![
            ("inmes", 13.into()),
            ("vadebito", dec!(1).into()),
            ("vacredito", dec!(0).into()),
        ]),
    ]]);
    let repo = CashRepository::new(db, shipped_templates());

    let months = repo.monthly_movements(2025).await.unwrap();

    assert_eq!(months.len(), 1);
    assert_eq!(months[0].month, 1);
    assert_eq!(months[0].debit, dec!(10));
}

#[tokio::test]
async fn test_ledger_rows_with_invalid_month_are_skipped() {
    let ledger_row = |month: i32, debit: Decimal| {
        row(vec![
            ("coexercicio", 2025.into()),
            ("coug", 110_001i64.into()),
            ("noug", "Secretaria da Fazenda".into()),
            ("cocontacontabil", "111110100".into()),
            ("nocontacontabil", "Caixa".into()),
            ("inmes", month.into()),
            ("vadebito", Value::from(debit)),
            ("vacredito", dec!(0).into()),
        ])
    };
    let db = mock_db(vec![vec![ledger_row(-1, dec!(9)), ledger_row(6, dec!(3))]]);
    let repo = CashRepository::new(db, shipped_templates());

    let rows = repo.ledger_movements(2025, 6, 100).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].month, 6);
    assert_eq!(rows[0].debit, dec!(3));
}

#[tokio::test]
async fn test_unit_movements_maps_rows() {
    let db = mock_db(vec![vec![
        row(vec![
            ("coug", 1i64.into()),
            ("noug", "UG 1".into()),
            ("vadebito", dec!(10).into()),
            ("vacredito", dec!(4).into()),
        ]),
        row(vec![
            ("coug", 2i64.into()),
            ("noug", Value::String(None)),
            ("vadebito", dec!(0).into()),
            ("vacredito", dec!(3).into()),
        ]),
    ]]);
    let repo = CashRepository::new(db, shipped_templates());

    let rows = repo.unit_movements(2025, 6).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].unit_name, None);
}

#[tokio::test]
async fn test_database_error_becomes_data_access() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let repo = CashRepository::new(db, shipped_templates());

    let err = repo.available_years().await.unwrap_err();

    assert!(matches!(err, AppError::DataAccess(msg) if msg.contains("connection reset")));
}

#[tokio::test]
async fn test_missing_template_runs_no_sql() {
    let empty = tempfile::TempDir::new().unwrap();
    let repo = CashRepository::new(mock_db(vec![]), Arc::new(SqlTemplateStore::new(empty.path())));

    let err = repo.available_years().await.unwrap_err();

    assert_eq!(
        err,
        AppError::TemplateNotFound(template_names::YEARS.to_string())
    );
    assert!(repo.into_connection().into_transaction_log().is_empty());
}
