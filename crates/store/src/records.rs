//! Stored record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_core::ledger::ParticipantBalance;
use divvy_core::split::SplitPolicy;
use divvy_shared::types::{ExpenseId, GroupId, ParticipantId, SplitId};

/// An expense-sharing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group identity.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Running total of all expense amounts in the group.
    pub total_spent: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Participant identity.
    pub id: ParticipantId,
    /// Owning group.
    pub group_id: GroupId,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Display color for UI clients.
    pub color: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Expense identity.
    pub id: ExpenseId,
    /// Owning group.
    pub group_id: GroupId,
    /// Participant who paid.
    pub payer_id: ParticipantId,
    /// Amount paid, two decimal places.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
    /// Expense category.
    pub category: String,
    /// Split policy used to divide the amount.
    pub policy: SplitPolicy,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One participant's persisted share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Split row identity.
    pub id: SplitId,
    /// Parent expense.
    pub expense_id: ExpenseId,
    /// Participant owing this share.
    pub participant_id: ParticipantId,
    /// Share amount, two decimal places.
    pub share_amount: Decimal,
}

/// An expense together with its split rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseWithSplits {
    /// The expense record.
    pub expense: ExpenseRecord,
    /// All split rows for the expense.
    pub splits: Vec<SplitRecord>,
}

/// Expenses a participant paid or shares in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantExpenses {
    /// Expenses the participant paid, newest first.
    pub paid: Vec<ExpenseRecord>,
    /// Expenses the participant has a share in, newest first.
    pub shared: Vec<ExpenseRecord>,
}

/// Aggregated group overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group identity.
    pub group_id: GroupId,
    /// Group name.
    pub name: String,
    /// Total spent across all expenses.
    pub total_spent: Decimal,
    /// Per-participant balances.
    pub participants: Vec<ParticipantBalance>,
}
