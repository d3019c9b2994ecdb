//! Bilateral balance resolution.
//!
//! Answers the narrower, pairwise question: across all of the group's
//! expenses, how much does A owe B and vice versa? Works from the persisted
//! split records only, so it stays consistent with group-wide aggregation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{ExpenseId, ParticipantId, round_amount};

use crate::ledger::{Expense, Split};

/// Directional totals between two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairBalance {
    /// What A owes B, clamped at zero.
    pub a_owes_b: Decimal,
    /// What B owes A, clamped at zero.
    pub b_owes_a: Decimal,
    /// `b_owes_a - a_owes_b`; positive means B should pay A.
    pub net: Decimal,
}

/// Resolves the net amount owed between a pair of participants.
///
/// For every expense paid by A, B's split (if any) accumulates into
/// "B owes A"; symmetrically for expenses paid by B. A participant cannot
/// negatively owe, so both directional totals are clamped at zero.
#[must_use]
pub fn resolve_pair(
    a: ParticipantId,
    b: ParticipantId,
    expenses: &[Expense],
    splits: &[Split],
) -> PairBalance {
    let payer_by_expense: BTreeMap<ExpenseId, ParticipantId> =
        expenses.iter().map(|e| (e.id, e.payer_id)).collect();

    let mut a_owes_b = Decimal::ZERO;
    let mut b_owes_a = Decimal::ZERO;

    for split in splits {
        let Some(payer) = payer_by_expense.get(&split.expense_id) else {
            continue;
        };
        if *payer == a && split.participant_id == b {
            b_owes_a += split.share_amount;
        } else if *payer == b && split.participant_id == a {
            a_owes_b += split.share_amount;
        }
    }

    let a_owes_b = round_amount(a_owes_b).max(Decimal::ZERO);
    let b_owes_a = round_amount(b_owes_a).max(Decimal::ZERO);

    PairBalance {
        a_owes_b,
        b_owes_a,
        net: round_amount(b_owes_a - a_owes_b),
    }
}
