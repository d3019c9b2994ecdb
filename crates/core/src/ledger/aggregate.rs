//! Per-participant balance aggregation.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use divvy_shared::types::{ParticipantId, round_amount};

use super::types::{Expense, Participant, ParticipantBalance, Split};

/// Aggregates a group snapshot into per-participant balances.
///
/// Every known participant appears in the output, zeroed if they have no
/// activity. Expenses or splits referencing a participant outside the
/// snapshot are skipped rather than failing the whole aggregation; such rows
/// can linger after a participant is removed from the group.
///
/// The fold is commutative over expenses and splits, so the result does not
/// depend on snapshot ordering. Totals are accumulated at full precision and
/// rounded once at the end; `net_balance` is the difference of the rounded
/// totals.
#[must_use]
pub fn aggregate_balances(
    participants: &[Participant],
    expenses: &[Expense],
    splits: &[Split],
) -> BTreeMap<ParticipantId, ParticipantBalance> {
    let known: BTreeSet<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut paid: BTreeMap<ParticipantId, Decimal> = BTreeMap::new();
    let mut owed: BTreeMap<ParticipantId, Decimal> = BTreeMap::new();

    for expense in expenses {
        if known.contains(&expense.payer_id) {
            *paid.entry(expense.payer_id).or_default() += expense.amount;
        }
    }

    for split in splits {
        if known.contains(&split.participant_id) {
            *owed.entry(split.participant_id).or_default() += split.share_amount;
        }
    }

    participants
        .iter()
        .map(|participant| {
            let total_paid = round_amount(paid.get(&participant.id).copied().unwrap_or_default());
            let total_owed = round_amount(owed.get(&participant.id).copied().unwrap_or_default());
            (
                participant.id,
                ParticipantBalance {
                    participant_id: participant.id,
                    name: participant.name.clone(),
                    total_paid,
                    total_owed,
                    net_balance: round_amount(total_paid - total_owed),
                },
            )
        })
        .collect()
}
