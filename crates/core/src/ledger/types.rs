//! Immutable snapshot types handed to the engine by the store.
//!
//! The engine never mutates these; every derived value is recomputed from a
//! fresh snapshot on each call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{ExpenseId, ParticipantId};

use crate::split::SplitPolicy;

/// A group member as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant identity.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
}

/// An expense as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense identity.
    pub id: ExpenseId,
    /// Who paid the full amount.
    pub payer_id: ParticipantId,
    /// Expense amount, two decimal places, non-negative.
    pub amount: Decimal,
    /// How the amount was split.
    pub policy: SplitPolicy,
}

/// One participant's share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The expense this share belongs to.
    pub expense_id: ExpenseId,
    /// The participant owing this share.
    pub participant_id: ParticipantId,
    /// Share amount, two decimal places, non-negative.
    pub share_amount: Decimal,
}

/// A consistent snapshot of a group's ledger.
///
/// The store guarantees that for each expense in the snapshot all of its
/// splits are present (no partial writes visible).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// All current group members, in insertion order.
    pub participants: Vec<Participant>,
    /// All expenses recorded for the group.
    pub expenses: Vec<Expense>,
    /// All split rows for those expenses.
    pub splits: Vec<Split>,
}

/// Derived per-participant balance. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    /// Participant identity.
    pub participant_id: ParticipantId,
    /// Display name, carried through for presentation.
    pub name: String,
    /// Sum of amounts of expenses this participant paid.
    pub total_paid: Decimal,
    /// Sum of this participant's share amounts across all splits.
    pub total_owed: Decimal,
    /// `total_paid - total_owed`; positive means the group owes them.
    pub net_balance: Decimal,
}
