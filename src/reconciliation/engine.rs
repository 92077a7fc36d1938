//! Period-by-period reconciliation of operations against statements

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::bank::{operations, StatementCheckpoint, Transaction, TransactionId};
use crate::reconciliation::verdict::*;
use crate::traits::*;
use crate::types::*;

/// Everything one reconciliation run looks at
#[derive(Debug, Clone, Default)]
pub struct ReconciliationCommand {
    pub transactions: Vec<Transaction>,
    pub checkpoints: Vec<StatementCheckpoint>,
}

impl ReconciliationCommand {
    pub fn new(transactions: Vec<Transaction>, checkpoints: Vec<StatementCheckpoint>) -> Self {
        Self {
            transactions,
            checkpoints,
        }
    }
}

/// Reconciliation engine
///
/// Stateless between calls; a single engine can be shared across threads.
pub struct ReconciliationEngine {
    clock: Arc<dyn Clock>,
    detector: Box<dyn DuplicateDetector>,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine on the system clock with id-based duplicate detection
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an engine stamping verdicts with the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_components(clock, Box::new(IdDuplicateDetector))
    }

    /// Create an engine with a custom duplicate detector
    pub fn with_components(clock: Arc<dyn Clock>, detector: Box<dyn DuplicateDetector>) -> Self {
        Self { clock, detector }
    }

    /// Reconcile operations against statements, one verdict per period
    ///
    /// Periods run between consecutive checkpoints once both inputs are
    /// sorted by date. An operation dated on an opening checkpoint belongs to
    /// the previous period, one dated on a closing checkpoint to this one.
    /// Fewer than two checkpoints yield no verdicts.
    #[instrument(
        skip_all,
        fields(
            transactions = command.transactions.len(),
            checkpoints = command.checkpoints.len()
        )
    )]
    pub fn sync(&self, command: &ReconciliationCommand) -> Vec<Verdict> {
        let executed_at = self.clock.now();
        let transactions = sort_by_date(&command.transactions, Transaction::date);
        let checkpoints = sort_by_date(&command.checkpoints, StatementCheckpoint::date);

        if checkpoints.len() < 2 {
            warn!(
                checkpoints = checkpoints.len(),
                "at least two checkpoints are needed to build a period"
            );
            return Vec::new();
        }

        let mut cursor = 0;
        let mut verdicts = Vec::with_capacity(checkpoints.len() - 1);

        for pair in checkpoints.windows(2) {
            let (opening, closing) = (pair[0], pair[1]);
            let period = Period::new(*opening.date(), *closing.date());

            let mut in_period: Vec<&Transaction> = Vec::new();
            while let Some(&transaction) = transactions.get(cursor) {
                if transaction.date().is_after(&period.end_date) {
                    break;
                }
                if transaction.date().is_after(&period.start_date) {
                    in_period.push(transaction);
                }
                cursor += 1;
            }

            let variation = closing.balance_difference(opening);
            verdicts.push(self.judge(executed_at, period, variation, &in_period));
        }

        let failed = verdicts.iter().filter(|v| !v.is_accepted()).count();
        info!(
            periods = verdicts.len(),
            failed,
            unassigned = transactions.len() - cursor,
            "reconciliation finished"
        );

        verdicts
    }

    fn judge(
        &self,
        executed_at: DateTime<Utc>,
        period: Period,
        statements_balance: Amount,
        transactions: &[&Transaction],
    ) -> Verdict {
        let operations_balance = operations::total_amount(transactions.iter().copied());

        if statements_balance == operations_balance {
            debug!(
                start = %period.start_date,
                end = %period.end_date,
                operations = transactions.len(),
                "period accepted"
            );
            return Verdict::accepted(executed_at, period);
        }

        let gap = statements_balance.subtract(&operations_balance);
        let duplicates = self.detector.find_duplicates(transactions);

        let (diagnosis, summary) = if duplicates.is_empty() {
            let summary = format!(
                "Balance mismatch detected between {} and {}. Expected variation: {}, Actual: {}, Difference: {}",
                period.start_date, period.end_date, statements_balance, operations_balance, gap
            );
            (Diagnosis::MissingOperation, summary)
        } else {
            let duplicated_ids: Vec<TransactionId> = duplicates.iter().map(Transaction::id).collect();
            let summary = format!(
                "Found {} duplicated operation(s) between {} and {}. Please review operations and remove duplicates of operation(s) with id(s) : [{}]",
                duplicates.len(),
                period.start_date,
                period.end_date,
                join_ids(&duplicated_ids)
            );
            (
                Diagnosis::DuplicatedOperations {
                    duplicated_ids,
                    operations: duplicates,
                },
                summary,
            )
        };

        let failure = Failure::new(diagnosis, summary, statements_balance, operations_balance, gap);
        warn!(
            start = %period.start_date,
            end = %period.end_date,
            code = %failure.code(),
            gap = %failure.gap(),
            "period failed validation"
        );

        Verdict::failed(executed_at, period, failure)
    }
}

fn sort_by_date<'a, T>(items: &'a [T], date: fn(&T) -> &CalendarDate) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    // stable: same-instant items keep their input order
    sorted.sort_by(|a, b| date(*a).compare(date(*b)));
    sorted
}

fn join_ids(ids: &[TransactionId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
