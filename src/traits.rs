//! Traits for the pluggable parts of reconciliation

use chrono::{DateTime, Utc};

use crate::bank::{operations, Transaction};

/// Source of "now"
///
/// Date validation and verdict timestamps read the current instant through
/// this trait so callers can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Trait for finding re-imported operations within a period
pub trait DuplicateDetector: Send + Sync {
    /// Return one representative per duplicated operation, in detection order
    fn find_duplicates(&self, transactions: &[&Transaction]) -> Vec<Transaction>;
}

/// Default detector: two operations are duplicates when they share an id
#[derive(Debug, Clone, Copy, Default)]
pub struct IdDuplicateDetector;

impl DuplicateDetector for IdDuplicateDetector {
    fn find_duplicates(&self, transactions: &[&Transaction]) -> Vec<Transaction> {
        operations::find_duplicates(transactions.iter().copied())
            .into_iter()
            .cloned()
            .collect()
    }
}
