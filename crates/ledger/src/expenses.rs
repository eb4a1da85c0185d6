//! Expense primitives.
//!
//! An `Expense` is a single payment event: one member paid an amount that a
//! set of participants share equally.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents, ResultLedger};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub paid_by: Uuid,
    pub created_at: DateTime<Utc>,
    /// Participants sharing the cost. Non-empty, duplicate-free, insertion
    /// order preserved (leftover cents of an uneven split go to the earliest
    /// entries).
    pub split_between: Vec<Uuid>,
}

impl Expense {
    pub fn new(
        description: String,
        amount: MoneyCents,
        paid_by: Uuid,
        split_between: Vec<Uuid>,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut split_between = split_between;
        split_between.retain(|id| seen.insert(*id));

        if split_between.is_empty() {
            return Err(LedgerError::InvalidSplit(
                "split_between must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            description,
            amount,
            paid_by,
            created_at,
            split_between,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (1..=n as u128).map(Uuid::from_u128).collect()
    }

    #[test]
    fn rejects_non_positive_amount() {
        let participants = ids(2);
        let err = Expense::new(
            "Lunch".to_string(),
            MoneyCents::ZERO,
            participants[0],
            participants.clone(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidAmount("amount must be > 0".to_string())
        );
    }

    #[test]
    fn rejects_empty_split() {
        let err = Expense::new(
            "Lunch".to_string(),
            MoneyCents::new(100),
            Uuid::from_u128(1),
            Vec::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidSplit("split_between must not be empty".to_string())
        );
    }

    #[test]
    fn deduplicates_split_preserving_order() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let expense = Expense::new(
            "Lunch".to_string(),
            MoneyCents::new(100),
            a,
            vec![b, a, b, a],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(expense.split_between, vec![b, a]);
    }
}
