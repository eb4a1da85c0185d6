//! Net-balance calculation over a group's open expenses.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{MoneyCents, expenses::Expense, members::Member};

/// Net balance per member id: positive = is owed, negative = owes.
pub type Balances = HashMap<Uuid, MoneyCents>;

/// Computes every member's net balance from scratch.
///
/// Pure and order-independent: each expense credits the payer with the full
/// amount and debits each participant with its share, so the result is a sum
/// over expenses. Balances are never stored; callers recompute on demand and
/// always see a result consistent with the current expense list.
///
/// Ids referenced by an expense but absent from `members` (a since-removed
/// member) get an entry created on demand and can end up with a nonzero
/// balance.
///
/// Uneven splits are distributed largest-remainder style: the leftover cents
/// go to the earliest-listed participants, one each, so the debits of a
/// single expense always sum exactly to its amount. The sum of all returned
/// balances is therefore exactly zero.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Balances {
    let mut balances: Balances = members
        .iter()
        .map(|member| (member.id, MoneyCents::ZERO))
        .collect();

    for expense in expenses {
        let participants = &expense.split_between;
        if participants.is_empty() {
            // Creation rejects empty splits; skip rather than divide by zero
            // if a malformed expense slips in through an old snapshot.
            continue;
        }

        let total = expense.amount.cents();
        let count = participants.len() as i64;
        let base = total / count;
        let remainder = (total % count) as usize;

        for (idx, participant) in participants.iter().enumerate() {
            let mut share = base;
            if idx < remainder {
                share += 1;
            }
            *balances.entry(*participant).or_insert(MoneyCents::ZERO) -= MoneyCents::new(share);
        }

        *balances.entry(expense.paid_by).or_insert(MoneyCents::ZERO) += expense.amount;
    }

    balances
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn members(names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Member {
                id: Uuid::from_u128(idx as u128 + 1),
                name: (*name).to_string(),
            })
            .collect()
    }

    fn expense(amount: i64, paid_by: Uuid, split: &[Uuid]) -> Expense {
        Expense::new(
            String::from("Test"),
            MoneyCents::new(amount),
            paid_by,
            split.to_vec(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_group_is_all_zero() {
        let members = members(&["Anna", "Bruno"]);
        let balances = compute_balances(&members, &[]);
        assert!(balances.values().all(|balance| balance.is_zero()));
    }

    #[test]
    fn equal_split_arithmetic() {
        // 90.00 between 3: each participant owes exactly 30.00; the payer,
        // being one of the three, nets +60.00.
        let members = members(&["Anna", "Bruno", "Carla"]);
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let balances = compute_balances(&members, &[expense(90_00, ids[0], &ids)]);

        assert_eq!(balances[&ids[0]], MoneyCents::new(60_00));
        assert_eq!(balances[&ids[1]], MoneyCents::new(-30_00));
        assert_eq!(balances[&ids[2]], MoneyCents::new(-30_00));
    }

    #[test]
    fn uneven_split_gives_leftover_cents_to_earliest_participants() {
        let members = members(&["Anna", "Bruno", "Carla"]);
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let balances = compute_balances(&members, &[expense(100, ids[0], &ids)]);

        // 100 cents over 3: shares are 34, 33, 33.
        assert_eq!(balances[&ids[0]], MoneyCents::new(100 - 34));
        assert_eq!(balances[&ids[1]], MoneyCents::new(-33));
        assert_eq!(balances[&ids[2]], MoneyCents::new(-33));
    }

    #[test]
    fn conservation_is_exact() {
        let members = members(&["Anna", "Bruno", "Carla", "Dora"]);
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let expenses = vec![
            expense(100, ids[0], &ids),
            expense(9999, ids[1], &ids[1..]),
            expense(1, ids[2], &[ids[0], ids[3]]),
            expense(33_34, ids[3], &ids[..3]),
        ];

        let balances = compute_balances(&members, &expenses);
        let sum: i64 = balances.values().map(|balance| balance.cents()).sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn removed_member_still_appears_with_balance() {
        let all = members(&["Anna", "Bruno"]);
        let ids: Vec<Uuid> = all.iter().map(|m| m.id).collect();
        let expenses = vec![expense(40_00, ids[0], &ids)];

        // Bruno left the roster, but the historical expense still counts.
        let balances = compute_balances(&all[..1], &expenses);
        assert_eq!(balances[&ids[1]], MoneyCents::new(-20_00));
        assert_eq!(balances[&ids[0]], MoneyCents::new(20_00));
    }

    #[test]
    fn payer_outside_split_carries_full_credit() {
        let members = members(&["Anna", "Bruno", "Carla"]);
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let balances = compute_balances(&members, &[expense(50_00, ids[0], &ids[1..])]);

        assert_eq!(balances[&ids[0]], MoneyCents::new(50_00));
        assert_eq!(balances[&ids[1]], MoneyCents::new(-25_00));
        assert_eq!(balances[&ids[2]], MoneyCents::new(-25_00));
    }

    #[test]
    fn malformed_empty_split_is_skipped() {
        let members = members(&["Anna"]);
        let bad = Expense {
            id: Uuid::from_u128(7),
            description: String::from("corrupt"),
            amount: MoneyCents::new(100),
            paid_by: members[0].id,
            created_at: Utc::now(),
            split_between: Vec::new(),
        };

        let balances = compute_balances(&members, &[bad]);
        assert_eq!(balances[&members[0].id], MoneyCents::ZERO);
    }
}
