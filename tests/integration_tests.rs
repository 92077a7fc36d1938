//! Integration tests for reconciliation-core

use chrono::{TimeZone, Utc};
use reconciliation_core::{
    Amount, CalendarDate, FailureCode, FixedClock, NormalizedLabel, ReconciliationCommand,
    ReconciliationConfig, ReconciliationEngine, ReconciliationRequest, ReconciliationService,
    StatementCheckpoint, Transaction, TransactionId, VerdictStatus,
};
use std::sync::Arc;
use std::thread;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap(),
    ))
}

fn date(day: &str) -> CalendarDate {
    CalendarDate::parse_with_clock(day, clock().as_ref()).unwrap()
}

fn operation(id: i64, day: &str, amount: f64) -> Transaction {
    Transaction::new(
        id,
        date(day),
        NormalizedLabel::new("virement").unwrap(),
        Amount::try_from_f64(amount).unwrap(),
    )
}

fn checkpoint(day: &str, balance: f64) -> StatementCheckpoint {
    StatementCheckpoint::new(date(day), Amount::try_from_f64(balance).unwrap())
}

fn engine() -> ReconciliationEngine {
    ReconciliationEngine::with_clock(clock())
}

#[test]
fn test_single_balanced_period() {
    let command = ReconciliationCommand::new(
        vec![operation(1, "2024-01-15", 500.0)],
        vec![checkpoint("2024-01-01", 1000.0), checkpoint("2024-01-31", 1500.0)],
    );

    let verdicts = engine().sync(&command);

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].status(), VerdictStatus::Accepted);
}

#[test]
fn test_duplicated_imports() {
    let command = ReconciliationCommand::new(
        vec![
            operation(1, "2024-01-15", 100.0),
            operation(1, "2024-01-15", 100.0),
            operation(2, "2024-01-15", 50.0),
            operation(2, "2024-01-15", 50.0),
        ],
        vec![checkpoint("2024-01-01", 1000.0), checkpoint("2024-01-31", 1250.0)],
    );

    let verdicts = engine().sync(&command);

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].status(), VerdictStatus::ValidationFailed);
    assert_eq!(verdicts[0].code(), Some(FailureCode::DuplicatedOperations));
    assert_eq!(
        verdicts[0].failure().unwrap().duplicated_ids(),
        &[TransactionId::new(1), TransactionId::new(2)]
    );
}

#[test]
fn test_missing_operation() {
    let command = ReconciliationCommand::new(
        vec![operation(1, "2024-01-15", 300.0)],
        vec![checkpoint("2024-01-01", 1000.0), checkpoint("2024-01-31", 1500.0)],
    );

    let verdicts = engine().sync(&command);
    let failure = verdicts[0].failure().unwrap();

    assert_eq!(failure.code(), FailureCode::MissingOperation);
    assert_eq!(failure.gap(), &Amount::try_from_f64(200.0).unwrap());
}

#[test]
fn test_no_operations_and_flat_balance() {
    let command = ReconciliationCommand::new(
        vec![],
        vec![checkpoint("2024-01-01", 1000.0), checkpoint("2024-01-31", 1000.0)],
    );

    let verdicts = engine().sync(&command);

    assert_eq!(verdicts.len(), 1);
    assert!(verdicts[0].is_accepted());
}

#[test]
fn test_two_balanced_periods() {
    let command = ReconciliationCommand::new(
        vec![
            operation(1, "2024-01-10", 250.0),
            operation(2, "2024-01-20", -50.0),
            operation(3, "2024-02-14", 75.25),
        ],
        vec![
            checkpoint("2024-01-01", 1000.0),
            checkpoint("2024-01-31", 1200.0),
            checkpoint("2024-02-29", 1275.25),
        ],
    );

    let verdicts = engine().sync(&command);

    assert_eq!(verdicts.len(), 2);
    assert!(verdicts.iter().all(|v| v.is_accepted()));
}

#[test]
fn test_failure_is_local_to_its_period() {
    let command = ReconciliationCommand::new(
        vec![
            operation(1, "2024-01-10", 200.0),
            operation(2, "2024-02-10", 10.0),
            operation(3, "2024-03-10", -20.0),
        ],
        vec![
            checkpoint("2024-01-01", 0.0),
            checkpoint("2024-01-31", 200.0),
            checkpoint("2024-02-29", 260.0),
            checkpoint("2024-03-31", 240.0),
        ],
    );

    let verdicts = engine().sync(&command);
    let statuses: Vec<VerdictStatus> = verdicts.iter().map(|v| v.status()).collect();

    assert_eq!(
        statuses,
        vec![
            VerdictStatus::Accepted,
            VerdictStatus::ValidationFailed,
            VerdictStatus::Accepted
        ]
    );
    assert_eq!(
        verdicts[1].failure().unwrap().gap(),
        &Amount::from_cents(5000)
    );
}

#[test]
fn test_operation_on_checkpoint_day_belongs_to_closing_period() {
    // the 01-31 operation closes January, so February must not see it
    let command = ReconciliationCommand::new(
        vec![operation(1, "2024-01-31", 100.0)],
        vec![
            checkpoint("2024-01-01", 0.0),
            checkpoint("2024-01-31", 100.0),
            checkpoint("2024-02-29", 100.0),
        ],
    );

    let verdicts = engine().sync(&command);

    assert!(verdicts[0].is_accepted());
    assert!(verdicts[1].is_accepted());
}

#[test]
fn test_same_inputs_same_verdicts() {
    let command = ReconciliationCommand::new(
        vec![operation(1, "2024-01-15", 300.0)],
        vec![checkpoint("2024-01-01", 1000.0), checkpoint("2024-01-31", 1500.0)],
    );

    let engine = ReconciliationEngine::new();
    let first = engine.sync(&command);
    let second = engine.sync(&command);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.period(), b.period());
        assert_eq!(a.status(), b.status());
        assert_eq!(
            a.failure().map(|f| f.summary().to_string()),
            b.failure().map(|f| f.summary().to_string())
        );
    }
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = Arc::new(engine());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let command = ReconciliationCommand::new(
                    vec![operation(i, "2024-01-15", i as f64)],
                    vec![checkpoint("2024-01-01", 0.0), checkpoint("2024-01-31", 1.0)],
                );
                engine.sync(&command)[0].is_accepted()
            })
        })
        .collect();

    let accepted: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(accepted, vec![false, true, false, false]);
}

#[test]
fn test_json_request_with_duplicates() {
    let service = ReconciliationService::with_clock(ReconciliationConfig::default(), clock());

    let output = service
        .validate_json(
            r#"{
                "movements": [
                    { "id": 10, "date": "2024-03-02", "wording": "Prélèvement EDF", "amount": -80 },
                    { "id": 10, "date": "2024-03-02", "wording": "PRELEVEMENT  EDF", "amount": -80 },
                    { "id": 11, "date": "2024-03-05", "wording": "Salaire", "amount": 2000 }
                ],
                "balances": [
                    { "date": "2024-03-01", "balance": 500 },
                    { "date": "2024-03-31", "balance": 2420 }
                ]
            }"#,
        )
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    let reason = &json["reasons"][0];

    assert_eq!(json["isValid"], false);
    assert_eq!(reason["message"], "VALIDATION_FAILED");
    assert_eq!(reason["code"], "DUPLICATED_OPERATIONS");
    assert_eq!(reason["numberOfDuplicates"], 1);
    assert_eq!(reason["duplicatedIds"], serde_json::json!([10]));
    assert_eq!(reason["duplicatedOperation"][0]["wording"], "PRELEVEMENT EDF");
    assert_eq!(reason["duplicatedOperation"][0]["amount"], -80.0);
    assert_eq!(reason["statementsBalance"], 1920.0);
    assert_eq!(reason["operationsBalance"], 1840.0);
    assert_eq!(reason["gap"], 80.0);
}

#[test]
fn test_request_validation_errors() {
    let request = ReconciliationRequest::from_json(
        r#"{
            "movements": [{ "id": 1.5, "date": "2024-03-02", "wording": "X", "amount": 1 }],
            "balances": [
                { "date": "2024-03-01", "balance": 0 },
                { "date": "2024-03-31", "balance": 1 }
            ]
        }"#,
    )
    .unwrap();

    let error = request
        .to_command(&ReconciliationConfig::default(), clock().as_ref())
        .unwrap_err();

    assert!(error.to_string().starts_with("Invalid transaction: movements[0]"));
}
