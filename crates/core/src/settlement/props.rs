//! Property-based tests for the settlement solver.
//!
//! - Settlement correctness: applying the plan zeroes every net balance
//! - Plan length bound: at most N-1 payments for N participants

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use divvy_shared::types::{EPSILON, ExpenseId, ParticipantId};

use crate::ledger::{Expense, Participant, ParticipantBalance, Split, aggregate_balances};
use crate::split::{SplitPolicy, SplitSpec, compute_shares};

use super::solver::solve_settlements;

/// Strategy to generate positive two-decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy producing a full aggregated balance map from random equal-split
/// expenses, so solver inputs always satisfy the conservation invariant.
fn aggregated_balances() -> impl Strategy<Value = BTreeMap<ParticipantId, ParticipantBalance>> {
    (
        2usize..=8,
        prop::collection::vec((0usize..8, positive_amount()), 0..12),
    )
        .prop_map(|(n, seeds)| {
            let participants: Vec<Participant> = (0..n)
                .map(|i| Participant {
                    id: ParticipantId::new(),
                    name: format!("p{i}"),
                })
                .collect();
            let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();

            let mut expenses = Vec::new();
            let mut splits = Vec::new();
            for (payer_seed, amount) in seeds {
                let expense = Expense {
                    id: ExpenseId::new(),
                    payer_id: ids[payer_seed % ids.len()],
                    amount,
                    policy: SplitPolicy::Equal,
                };
                let shares = compute_shares(amount, &SplitSpec::Equal(ids.clone())).unwrap();
                splits.extend(shares.into_iter().map(|share| Split {
                    expense_id: expense.id,
                    participant_id: share.participant_id,
                    share_amount: share.amount,
                }));
                expenses.push(expense);
            }

            aggregate_balances(&participants, &expenses, &splits)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying every settlement (credit the payer's net, debit the payee's)
    /// drives all net balances close to zero. Positions inside the tolerance
    /// band are excluded from the plan, so a counterparty can be left holding
    /// their combined residue; the worst case is one cent per participant.
    #[test]
    fn prop_settlements_zero_all_balances(balances in aggregated_balances()) {
        let settlements = solve_settlements(&balances);
        let bound = EPSILON * Decimal::from(balances.len());

        let mut nets: BTreeMap<ParticipantId, Decimal> = balances
            .values()
            .map(|b| (b.participant_id, b.net_balance))
            .collect();
        for s in &settlements {
            *nets.get_mut(&s.from_id).unwrap() += s.amount;
            *nets.get_mut(&s.to_id).unwrap() -= s.amount;
        }
        for (id, net) in nets {
            prop_assert!(net.abs() <= bound, "participant {} residual {}", id, net);
        }
    }

    /// The plan never exceeds N-1 payments and every amount is positive.
    #[test]
    fn prop_plan_is_bounded_and_positive(balances in aggregated_balances()) {
        let settlements = solve_settlements(&balances);
        if !balances.is_empty() {
            prop_assert!(settlements.len() <= balances.len() - 1);
        }
        for s in &settlements {
            prop_assert!(s.amount > Decimal::ZERO);
            prop_assert_eq!(s.amount, s.amount.round_dp(2));
            prop_assert_ne!(s.from_id, s.to_id);
        }
    }

    /// Solving the same balances twice yields the same plan.
    #[test]
    fn prop_solver_is_deterministic(balances in aggregated_balances()) {
        prop_assert_eq!(solve_settlements(&balances), solve_settlements(&balances));
    }
}
