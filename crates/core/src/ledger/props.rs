//! Property-based tests for balance aggregation.
//!
//! - Balance conservation: group net balances sum to ~0
//! - Determinism: the same snapshot always aggregates identically

use proptest::prelude::*;
use rust_decimal::Decimal;

use divvy_shared::types::{EPSILON, ExpenseId, ParticipantId};

use crate::split::{SplitPolicy, SplitSpec, compute_shares};

use super::aggregate::aggregate_balances;
use super::types::{Expense, Participant, Split};

/// Strategy to generate positive two-decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a group of 2-8 participants.
fn group() -> impl Strategy<Value = Vec<Participant>> {
    (2usize..=8).prop_map(|n| {
        (0..n)
            .map(|i| Participant {
                id: ParticipantId::new(),
                name: format!("p{i}"),
            })
            .collect()
    })
}

/// Strategy for a list of (payer index, amount) expense seeds.
fn expense_seeds() -> impl Strategy<Value = Vec<(usize, Decimal)>> {
    prop::collection::vec((0usize..8, positive_amount()), 0..12)
}

/// Materializes seeds into expenses with equal splits across the whole group.
fn build_ledger(
    participants: &[Participant],
    seeds: &[(usize, Decimal)],
) -> (Vec<Expense>, Vec<Split>) {
    let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut expenses = Vec::new();
    let mut splits = Vec::new();

    for (payer_seed, amount) in seeds {
        let expense = Expense {
            id: ExpenseId::new(),
            payer_id: ids[payer_seed % ids.len()],
            amount: *amount,
            policy: SplitPolicy::Equal,
        };
        let shares = compute_shares(*amount, &SplitSpec::Equal(ids.clone())).unwrap();
        splits.extend(shares.into_iter().map(|share| Split {
            expense_id: expense.id,
            participant_id: share.participant_id,
            share_amount: share.amount,
        }));
        expenses.push(expense);
    }

    (expenses, splits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every amount paid is fully distributed as shares, so the group's net
    /// balances sum to zero within the rounding tolerance.
    #[test]
    fn prop_net_balances_sum_to_zero(
        participants in group(),
        seeds in expense_seeds(),
    ) {
        let (expenses, splits) = build_ledger(&participants, &seeds);
        let balances = aggregate_balances(&participants, &expenses, &splits);
        let net_sum: Decimal = balances.values().map(|b| b.net_balance).sum();
        prop_assert!(net_sum.abs() <= EPSILON, "net sum drifted: {}", net_sum);
    }

    /// Aggregating the same snapshot twice yields identical balances.
    #[test]
    fn prop_aggregation_is_idempotent(
        participants in group(),
        seeds in expense_seeds(),
    ) {
        let (expenses, splits) = build_ledger(&participants, &seeds);
        let first = aggregate_balances(&participants, &expenses, &splits);
        let second = aggregate_balances(&participants, &expenses, &splits);
        prop_assert_eq!(first, second);
    }

    /// Every participant appears in the output, active or not.
    #[test]
    fn prop_all_participants_present(
        participants in group(),
        seeds in expense_seeds(),
    ) {
        let (expenses, splits) = build_ledger(&participants, &seeds);
        let balances = aggregate_balances(&participants, &expenses, &splits);
        prop_assert_eq!(balances.len(), participants.len());
        for p in &participants {
            prop_assert!(balances.contains_key(&p.id));
        }
    }
}
