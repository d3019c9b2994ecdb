//! Greedy debt-simplification solver.
//!
//! Reduces a group's net balances to a short list of pairwise payments:
//! repeatedly match the largest remaining debtor against the largest
//! remaining creditor and transfer `min` of their remaining amounts. For N
//! unsettled participants this emits at most N-1 payments.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{EPSILON, ParticipantId, is_settled, round_amount};

use crate::ledger::ParticipantBalance;

/// A proposed payment from one participant to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Paying participant.
    pub from_id: ParticipantId,
    /// Paying participant's display name.
    pub from_name: String,
    /// Receiving participant.
    pub to_id: ParticipantId,
    /// Receiving participant's display name.
    pub to_name: String,
    /// Payment amount, strictly positive, two decimal places.
    pub amount: Decimal,
}

/// One side of the netting loop with its remaining unsettled amount.
#[derive(Debug, Clone)]
struct OpenPosition {
    participant_id: ParticipantId,
    name: String,
    remaining: Decimal,
}

/// Computes the settlement plan for a set of net balances.
///
/// Participants within ±0.01 of zero are already settled and excluded.
/// Both sides are sorted descending by magnitude with a stable sort, so
/// equal amounts keep the balance map's id order; the result is fully
/// deterministic for a given input.
///
/// Never fails: an empty or already-settled group yields an empty plan.
#[must_use]
pub fn solve_settlements(
    balances: &BTreeMap<ParticipantId, ParticipantBalance>,
) -> Vec<Settlement> {
    let mut debtors: Vec<OpenPosition> = Vec::new();
    let mut creditors: Vec<OpenPosition> = Vec::new();

    for balance in balances.values() {
        if is_settled(balance.net_balance) {
            continue;
        }
        let position = OpenPosition {
            participant_id: balance.participant_id,
            name: balance.name.clone(),
            remaining: balance.net_balance.abs(),
        };
        if balance.net_balance < Decimal::ZERO {
            debtors.push(position);
        } else {
            creditors.push(position);
        }
    }

    // Stable sorts keep id order among equal magnitudes.
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut settlements = Vec::new();
    let mut di = 0;
    let mut ci = 0;

    // Index-based walk instead of shifting the lists; a position is passed
    // over once its remaining amount drops below one cent.
    while di < debtors.len() && ci < creditors.len() {
        let amount = debtors[di].remaining.min(creditors[ci].remaining);

        settlements.push(Settlement {
            from_id: debtors[di].participant_id,
            from_name: debtors[di].name.clone(),
            to_id: creditors[ci].participant_id,
            to_name: creditors[ci].name.clone(),
            amount: round_amount(amount),
        });

        debtors[di].remaining = round_amount(debtors[di].remaining - amount);
        creditors[ci].remaining = round_amount(creditors[ci].remaining - amount);

        if debtors[di].remaining < EPSILON {
            di += 1;
        }
        if creditors[ci].remaining < EPSILON {
            ci += 1;
        }
    }

    settlements
}
