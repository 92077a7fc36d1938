//! Set-level helpers over imported operations

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::bank::{Transaction, TransactionId};
use crate::types::Amount;

/// Find operations whose id occurs more than once
///
/// Returns the first-seen instance of each repeated id, ordered by when the
/// repetition was detected. Single pass.
pub fn find_duplicates<'a, I>(transactions: I) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut first_seen: HashMap<TransactionId, &'a Transaction> = HashMap::new();
    let mut flagged: HashSet<TransactionId> = HashSet::new();
    let mut duplicated_ids: Vec<TransactionId> = Vec::new();

    for transaction in transactions {
        match first_seen.entry(transaction.id()) {
            Entry::Occupied(_) => {
                if flagged.insert(transaction.id()) {
                    duplicated_ids.push(transaction.id());
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(transaction);
            }
        }
    }

    duplicated_ids
        .iter()
        .filter_map(|id| first_seen.get(id).copied())
        .collect()
}

/// Sum of the operation amounts, zero for an empty set
pub fn total_amount<'a, I>(transactions: I) -> Amount
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(Amount::zero(), |total, transaction| {
            total.add(transaction.amount())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FixedClock;
    use crate::types::{CalendarDate, NormalizedLabel};
    use chrono::{TimeZone, Utc};

    fn operation(id: i64, label: &str, cents: i64) -> Transaction {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        Transaction::new(
            id,
            CalendarDate::from_ymd(2024, 1, 15, &clock).unwrap(),
            NormalizedLabel::new(label).unwrap(),
            Amount::from_cents(cents),
        )
    }

    #[test]
    fn test_no_duplicates() {
        let ops = vec![operation(1, "a", 100), operation(2, "a", 100)];
        assert!(find_duplicates(&ops).is_empty());
    }

    #[test]
    fn test_one_representative_per_repeated_id() {
        let ops = vec![
            operation(5, "first five", 100),
            operation(9, "nine", 200),
            operation(9, "nine again", 200),
            operation(5, "second five", 100),
            operation(5, "third five", 100),
        ];

        let duplicates = find_duplicates(&ops);
        let ids: Vec<i64> = duplicates.iter().map(|op| op.id().value()).collect();

        assert_eq!(ids, vec![9, 5]);
        assert_eq!(duplicates[1].label().as_str(), "FIRST FIVE");
    }

    #[test]
    fn test_total_amount() {
        let ops = vec![
            operation(1, "in", 50000),
            operation(2, "out", -12345),
            operation(3, "fee", -5),
        ];
        assert_eq!(total_amount(&ops), Amount::from_cents(37650));
        assert_eq!(total_amount(Vec::<&Transaction>::new()), Amount::zero());
    }
}
