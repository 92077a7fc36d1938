//! Imported bank operations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;

/// Identifier assigned to an operation by the scraping provider
///
/// Not unique across an import: a repeated id is how re-imported operations
/// are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for TransactionId {
    type Error = DomainError;

    fn try_from(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::InvalidTransaction(
                "Bank operation id must be a finite number".to_string(),
            ));
        }

        if value.fract() != 0.0 {
            return Err(DomainError::InvalidTransaction(format!(
                "Bank operation id must be a whole number, got {value}"
            )));
        }

        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(DomainError::InvalidTransaction(format!(
                "Bank operation id {value} is out of range"
            )));
        }

        Ok(Self(value as i64))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single imported bank operation
///
/// There is no `PartialEq`: identity ([`Transaction::has_same_id`]) and
/// economic equality ([`Transaction::has_same_value_as`]) are different
/// questions and callers have to pick one.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    id: TransactionId,
    date: CalendarDate,
    label: NormalizedLabel,
    amount: Amount,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        id: impl Into<TransactionId>,
        date: CalendarDate,
        label: NormalizedLabel,
        amount: Amount,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            label,
            amount,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn date(&self) -> &CalendarDate {
        &self.date
    }

    pub fn label(&self) -> &NormalizedLabel {
        &self.label
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    /// Whether both operations carry the same provider id
    pub fn has_same_id(&self, other: &Transaction) -> bool {
        self.id == other.id
    }

    /// Whether both operations describe the same movement, ignoring ids
    pub fn has_same_value_as(&self, other: &Transaction) -> bool {
        self.date.is_same_day(&other.date)
            && self.label == other.label
            && self.amount == other.amount
    }

    pub fn is_same_day_as(&self, other: &Transaction) -> bool {
        self.date.is_same_day(&other.date)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.id, self.date, self.label, self.amount
        )
    }
}

/// Transaction builder for assembling an operation from optional parts
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    id: Option<TransactionId>,
    date: Option<CalendarDate>,
    label: Option<NormalizedLabel>,
    amount: Option<Amount>,
}

impl TransactionBuilder {
    /// Create a new transaction builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn date(mut self, date: CalendarDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn label(mut self, label: NormalizedLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Build the transaction
    pub fn build(self) -> DomainResult<Transaction> {
        let id = self.id.ok_or_else(|| {
            DomainError::InvalidTransaction("Bank operation id is required".to_string())
        })?;

        match (self.date, self.label, self.amount) {
            (Some(date), Some(label), Some(amount)) => {
                Ok(Transaction::new(id, date, label, amount))
            }
            _ => Err(DomainError::InvalidTransaction(
                "Invalid bank operation input: date, label and amount are required".to_string(),
            )),
        }
    }
}
