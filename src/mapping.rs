//! Request and response shapes at the boundary of the reconciliation core
//!
//! Raw movements and balances are turned into domain objects here, so every
//! construction error surfaces before the engine runs. Verdicts are flattened
//! back into plain numbers and ISO-8601 strings.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::bank::*;
use crate::config::ReconciliationConfig;
use crate::reconciliation::{FailureCode, ReconciliationCommand, Verdict, VerdictStatus};
use crate::traits::Clock;
use crate::types::*;
use crate::utils::validation::{at_position, validate_balance_count, validate_movement_count};

/// Amount as sent by clients, either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn to_amount(&self) -> DomainResult<Amount> {
        match self {
            RawAmount::Number(value) => Amount::try_from_f64(*value),
            RawAmount::Text(text) => text.parse(),
        }
    }
}

/// One imported bank operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementDto {
    pub id: Option<f64>,
    pub date: Option<String>,
    pub wording: Option<String>,
    pub amount: Option<RawAmount>,
}

impl MovementDto {
    pub fn to_transaction(&self, clock: &dyn Clock) -> DomainResult<Transaction> {
        let mut builder = TransactionBuilder::new();

        if let Some(id) = self.id {
            builder = builder.id(TransactionId::try_from(id)?);
        }
        if let Some(date) = &self.date {
            builder = builder.date(CalendarDate::parse_with_clock(date, clock)?);
        }
        if let Some(wording) = &self.wording {
            builder = builder.label(NormalizedLabel::new(wording)?);
        }
        if let Some(amount) = &self.amount {
            builder = builder.amount(amount.to_amount()?);
        }

        builder.build()
    }
}

/// One certified statement balance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceDto {
    pub date: Option<String>,
    pub balance: Option<RawAmount>,
}

impl BalanceDto {
    pub fn to_checkpoint(&self, clock: &dyn Clock) -> DomainResult<StatementCheckpoint> {
        let date = self
            .date
            .as_deref()
            .map(|date| CalendarDate::parse_with_clock(date, clock))
            .transpose()?;
        let balance = self.balance.as_ref().map(RawAmount::to_amount).transpose()?;

        StatementCheckpoint::try_from_parts(date, balance)
    }
}

/// Body of a reconciliation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    #[serde(default)]
    pub movements: Vec<MovementDto>,
    #[serde(default)]
    pub balances: Vec<BalanceDto>,
}

impl ReconciliationRequest {
    pub fn from_json(payload: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Validate the request and build the engine's command
    pub fn to_command(
        &self,
        config: &ReconciliationConfig,
        clock: &dyn Clock,
    ) -> DomainResult<ReconciliationCommand> {
        validate_movement_count(self.movements.len(), config)?;
        validate_balance_count(self.balances.len(), config)?;

        let transactions = self
            .movements
            .iter()
            .enumerate()
            .map(|(index, movement)| {
                movement
                    .to_transaction(clock)
                    .map_err(|e| at_position(e, "movements", index))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let checkpoints = self
            .balances
            .iter()
            .enumerate()
            .map(|(index, balance)| {
                balance
                    .to_checkpoint(clock)
                    .map_err(|e| at_position(e, "balances", index))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(ReconciliationCommand::new(transactions, checkpoints))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub id: i64,
    pub date: String,
    pub wording: String,
    pub amount: f64,
}

impl From<&Transaction> for OperationResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id().value(),
            date: transaction
                .date()
                .instant()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            wording: transaction.label().to_string(),
            amount: transaction.amount().to_f64(),
        }
    }
}

/// One flattened verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonResponse {
    pub execution_date: String,
    pub period: PeriodResponse,
    pub message: VerdictStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<FailureCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_duplicates: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicated_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicated_operation: Option<Vec<OperationResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

impl From<&Verdict> for ReasonResponse {
    fn from(verdict: &Verdict) -> Self {
        let mut reason = Self {
            execution_date: verdict
                .executed_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            period: PeriodResponse {
                start_date: verdict.period().start_date.to_string(),
                end_date: verdict.period().end_date.to_string(),
            },
            message: verdict.status(),
            code: None,
            summary: None,
            number_of_duplicates: None,
            duplicated_ids: None,
            duplicated_operation: None,
            statements_balance: None,
            operations_balance: None,
            gap: None,
        };

        if let Some(failure) = verdict.failure() {
            reason.code = Some(failure.code());
            reason.summary = Some(failure.summary().to_string());
            reason.statements_balance = Some(failure.statements_balance().to_f64());
            reason.operations_balance = Some(failure.operations_balance().to_f64());
            reason.gap = Some(failure.gap().to_f64());

            if !failure.duplicated_ids().is_empty() {
                reason.number_of_duplicates = Some(failure.duplicated_ids().len());
                reason.duplicated_ids = Some(
                    failure
                        .duplicated_ids()
                        .iter()
                        .map(TransactionId::value)
                        .collect(),
                );
                reason.duplicated_operation = Some(
                    failure
                        .duplicated_operations()
                        .iter()
                        .map(OperationResponse::from)
                        .collect(),
                );
            }
        }

        reason
    }
}

/// Body of a reconciliation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    /// False as soon as one period failed
    pub is_valid: bool,
    pub reasons: Vec<ReasonResponse>,
}

impl ReconciliationResponse {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        Self {
            is_valid: verdicts.iter().all(Verdict::is_accepted),
            reasons: verdicts.iter().map(ReasonResponse::from).collect(),
        }
    }

    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
