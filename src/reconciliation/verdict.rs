//! Per-period reconciliation outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bank::{Transaction, TransactionId};
use crate::types::*;

/// Overall status of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// Operations explain the statement variation exactly
    Accepted,
    /// Operations and statements disagree
    ValidationFailed,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Accepted => "ACCEPTED",
            VerdictStatus::ValidationFailed => "VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a period failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// Operations are missing from (or extra in) the import
    MissingOperation,
    /// Some operations were imported more than once
    DuplicatedOperations,
}

impl FailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::MissingOperation => "MISSING_OPERATION",
            FailureCode::DuplicatedOperations => "DUPLICATED_OPERATIONS",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval between two consecutive checkpoints
///
/// The start is exclusive, the end inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

impl Period {
    pub fn new(start_date: CalendarDate, end_date: CalendarDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Whether an operation dated `date` belongs to this period
    pub fn contains(&self, date: &CalendarDate) -> bool {
        date.is_after(&self.start_date) && date.is_before_or_equal(&self.end_date)
    }
}

/// Root cause reported for a failed period
#[derive(Debug, Clone, Serialize)]
pub enum Diagnosis {
    MissingOperation,
    DuplicatedOperations {
        duplicated_ids: Vec<TransactionId>,
        operations: Vec<Transaction>,
    },
}

/// Details of a failed period
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    diagnosis: Diagnosis,
    summary: String,
    statements_balance: Amount,
    operations_balance: Amount,
    gap: Amount,
}

impl Failure {
    pub fn new(
        diagnosis: Diagnosis,
        summary: String,
        statements_balance: Amount,
        operations_balance: Amount,
        gap: Amount,
    ) -> Self {
        Self {
            diagnosis,
            summary,
            statements_balance,
            operations_balance,
            gap,
        }
    }

    pub fn code(&self) -> FailureCode {
        match self.diagnosis {
            Diagnosis::MissingOperation => FailureCode::MissingOperation,
            Diagnosis::DuplicatedOperations { .. } => FailureCode::DuplicatedOperations,
        }
    }

    pub fn diagnosis(&self) -> &Diagnosis {
        &self.diagnosis
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Balance variation between the two certified statements
    pub fn statements_balance(&self) -> &Amount {
        &self.statements_balance
    }

    /// Sum of the operations assigned to the period
    pub fn operations_balance(&self) -> &Amount {
        &self.operations_balance
    }

    /// Statement variation minus operations total
    pub fn gap(&self) -> &Amount {
        &self.gap
    }

    /// Repeated ids, empty unless duplicates were diagnosed
    pub fn duplicated_ids(&self) -> &[TransactionId] {
        match &self.diagnosis {
            Diagnosis::DuplicatedOperations { duplicated_ids, .. } => duplicated_ids.as_slice(),
            Diagnosis::MissingOperation => &[],
        }
    }

    pub fn duplicated_operations(&self) -> &[Transaction] {
        match &self.diagnosis {
            Diagnosis::DuplicatedOperations { operations, .. } => operations.as_slice(),
            Diagnosis::MissingOperation => &[],
        }
    }
}

/// Outcome of a period
#[derive(Debug, Clone, Serialize)]
pub enum Outcome {
    Accepted,
    ValidationFailed(Failure),
}

/// Reconciliation result for one period
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    executed_at: DateTime<Utc>,
    period: Period,
    outcome: Outcome,
}

impl Verdict {
    pub fn accepted(executed_at: DateTime<Utc>, period: Period) -> Self {
        Self {
            executed_at,
            period,
            outcome: Outcome::Accepted,
        }
    }

    pub fn failed(executed_at: DateTime<Utc>, period: Period, failure: Failure) -> Self {
        Self {
            executed_at,
            period,
            outcome: Outcome::ValidationFailed(failure),
        }
    }

    /// When the reconciliation run that produced this verdict started
    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn status(&self) -> VerdictStatus {
        match self.outcome {
            Outcome::Accepted => VerdictStatus::Accepted,
            Outcome::ValidationFailed(_) => VerdictStatus::ValidationFailed,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Accepted => None,
            Outcome::ValidationFailed(failure) => Some(failure),
        }
    }

    pub fn code(&self) -> Option<FailureCode> {
        self.failure().map(Failure::code)
    }
}
