//! Certified statement balances

use serde::Serialize;
use std::fmt;

use crate::types::*;

/// A balance certified by the bank at a given date
///
/// Two checkpoints are equal when they fall on the same day with the same
/// balance, whatever the time of day.
#[derive(Debug, Clone, Serialize)]
pub struct StatementCheckpoint {
    date: CalendarDate,
    balance: Amount,
}

impl StatementCheckpoint {
    pub fn new(date: CalendarDate, balance: Amount) -> Self {
        Self { date, balance }
    }

    /// Build a checkpoint from parts that may be missing in the raw input
    pub fn try_from_parts(
        date: Option<CalendarDate>,
        balance: Option<Amount>,
    ) -> DomainResult<Self> {
        match (date, balance) {
            (Some(date), Some(balance)) => Ok(Self::new(date, balance)),
            _ => Err(DomainError::InvalidCheckpoint(
                "Statement checkpoint requires both date and balance".to_string(),
            )),
        }
    }

    pub fn date(&self) -> &CalendarDate {
        &self.date
    }

    pub fn balance(&self) -> &Amount {
        &self.balance
    }

    pub fn is_before(&self, other: &StatementCheckpoint) -> bool {
        self.date.is_before(&other.date)
    }

    pub fn is_after(&self, other: &StatementCheckpoint) -> bool {
        self.date.is_after(&other.date)
    }

    /// This balance minus `other`'s balance
    pub fn balance_difference(&self, other: &StatementCheckpoint) -> Amount {
        self.balance.subtract(&other.balance)
    }
}

impl PartialEq for StatementCheckpoint {
    fn eq(&self, other: &Self) -> bool {
        self.date.is_same_day(&other.date) && self.balance == other.balance
    }
}

impl Eq for StatementCheckpoint {}

impl fmt::Display for StatementCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.date, self.balance)
    }
}
