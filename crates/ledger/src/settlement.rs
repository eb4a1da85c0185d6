//! Debt simplification: collapse a balance map into a short list of
//! settling transfers.

use serde::Serialize;
use uuid::Uuid;

use crate::{MoneyCents, balance::Balances};

/// A directed payment instruction: `from` pays `to` the amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: MoneyCents,
}

/// Reduces a balance map to transfers that zero out every balance.
///
/// Greedy largest-first matching: debtors and creditors are sorted by
/// magnitude (descending, ids break exact ties so the plan is deterministic)
/// and walked with two cursors, settling `min(debt, credit)` at each step.
/// Not the global optimum in every pathological case, but never emits more
/// than `debtors + creditors - 1` transfers.
///
/// Members with a zero balance are excluded entirely. Every emitted transfer
/// has a strictly positive amount and distinct endpoints.
pub fn simplify(balances: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<(Uuid, i64)> = Vec::new();
    let mut creditors: Vec<(Uuid, i64)> = Vec::new();
    for (&member_id, &balance) in balances {
        match balance.cents() {
            cents if cents < 0 => debtors.push((member_id, -cents)),
            cents if cents > 0 => creditors.push((member_id, cents)),
            _ => {}
        }
    }

    debtors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    creditors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let settled = debtors[i].1.min(creditors[j].1);
        transfers.push(Transfer {
            from: debtors[i].0,
            to: creditors[j].0,
            amount: MoneyCents::new(settled),
        });

        debtors[i].1 -= settled;
        creditors[j].1 -= settled;
        // An exact tie drains both sides and advances both cursors.
        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(u128, i64)]) -> Balances {
        entries
            .iter()
            .map(|(id, cents)| (Uuid::from_u128(*id), MoneyCents::new(*cents)))
            .collect()
    }

    fn apply(balances: &Balances, transfers: &[Transfer]) -> Balances {
        let mut result = balances.clone();
        for transfer in transfers {
            *result.entry(transfer.from).or_insert(MoneyCents::ZERO) += transfer.amount;
            *result.entry(transfer.to).or_insert(MoneyCents::ZERO) -= transfer.amount;
        }
        result
    }

    #[test]
    fn empty_balances_yield_no_transfers() {
        assert!(simplify(&Balances::new()).is_empty());
        assert!(simplify(&balances(&[(1, 0), (2, 0)])).is_empty());
    }

    #[test]
    fn single_creditor_absorbs_all_debtors() {
        // Trip scenario: A paid 300.00 for three, so A = +200, B = C = -100.
        let balances = balances(&[(1, 200_00), (2, -100_00), (3, -100_00)]);
        let transfers = simplify(&balances);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: Uuid::from_u128(2),
                    to: Uuid::from_u128(1),
                    amount: MoneyCents::new(100_00),
                },
                Transfer {
                    from: Uuid::from_u128(3),
                    to: Uuid::from_u128(1),
                    amount: MoneyCents::new(100_00),
                },
            ]
        );
    }

    #[test]
    fn multi_creditor_largest_first_walk() {
        // A = +50, B = +30, C = -40, D = -40. Largest-first pairing settles
        // C against A, then D against A's remainder, then D against B.
        let balances = balances(&[(1, 50_00), (2, 30_00), (3, -40_00), (4, -40_00)]);
        let transfers = simplify(&balances);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: Uuid::from_u128(3),
                    to: Uuid::from_u128(1),
                    amount: MoneyCents::new(40_00),
                },
                Transfer {
                    from: Uuid::from_u128(4),
                    to: Uuid::from_u128(1),
                    amount: MoneyCents::new(10_00),
                },
                Transfer {
                    from: Uuid::from_u128(4),
                    to: Uuid::from_u128(2),
                    amount: MoneyCents::new(30_00),
                },
            ]
        );

        let settled = apply(&balances, &transfers);
        assert!(settled.values().all(|balance| balance.is_zero()));
    }

    #[test]
    fn exact_tie_advances_both_cursors() {
        let balances = balances(&[(1, 50_00), (2, -50_00), (3, 30_00), (4, -30_00)]);
        let transfers = simplify(&balances);

        assert_eq!(transfers.len(), 2);
        let settled = apply(&balances, &transfers);
        assert!(settled.values().all(|balance| balance.is_zero()));
    }

    #[test]
    fn transfers_are_positive_and_never_self_directed() {
        let balances = balances(&[(1, 12_34), (2, -1), (3, -12_33), (4, 0)]);
        let transfers = simplify(&balances);

        for transfer in &transfers {
            assert!(transfer.amount.is_positive());
            assert_ne!(transfer.from, transfer.to);
        }
        let settled = apply(&balances, &transfers);
        assert!(settled.values().all(|balance| balance.is_zero()));
    }

    #[test]
    fn transfer_count_stays_under_bound() {
        let balances = balances(&[
            (1, 70_00),
            (2, 20_00),
            (3, 10_00),
            (4, -25_00),
            (5, -25_00),
            (6, -50_00),
        ]);
        let transfers = simplify(&balances);

        // 3 debtors + 3 creditors: never more than 5 transfers.
        assert!(transfers.len() <= 5);
        let settled = apply(&balances, &transfers);
        assert!(settled.values().all(|balance| balance.is_zero()));
    }
}
