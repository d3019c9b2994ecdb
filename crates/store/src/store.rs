//! The in-memory ledger store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use divvy_core::ledger::{self, LedgerSnapshot, ParticipantBalance, aggregate_balances};
use divvy_core::split::{SplitSpec, compute_shares};
use divvy_shared::types::{ExpenseId, GroupId, ParticipantId, SplitId, round_amount};
use divvy_shared::{AppError, AppResult};

use crate::records::{
    ExpenseRecord, ExpenseWithSplits, GroupRecord, GroupSummary, ParticipantExpenses,
    ParticipantRecord, SplitRecord,
};

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning group.
    pub group_id: GroupId,
    /// Participant who paid.
    pub payer_id: ParticipantId,
    /// Amount paid.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
    /// Expense category; defaults to "general".
    pub category: Option<String>,
    /// When the expense happened; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// How to split the amount, in the caller's participant order.
    pub split: SplitSpec,
}

/// Partial update for an expense. `split` is required because any edit
/// invalidates the previously persisted split rows.
#[derive(Debug, Clone)]
pub struct UpdateExpenseInput {
    /// New amount, if changed.
    pub amount: Option<Decimal>,
    /// New description, if changed.
    pub description: Option<String>,
    /// New category, if changed.
    pub category: Option<String>,
    /// New date, if changed.
    pub date: Option<DateTime<Utc>>,
    /// Replacement split specification.
    pub split: SplitSpec,
}

/// Partial update for a group.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroupInput {
    /// New name, if changed.
    pub name: Option<String>,
    /// New description, if changed.
    pub description: Option<String>,
}

/// Partial update for a participant.
#[derive(Debug, Clone, Default)]
pub struct UpdateParticipantInput {
    /// New display name, if changed.
    pub name: Option<String>,
    /// New email, if changed.
    pub email: Option<String>,
    /// New display color, if changed.
    pub color: Option<String>,
}

/// In-memory document store for groups, participants, expenses and splits.
///
/// Per-group write discipline: every mutation of a group's ledger (expense
/// create/edit/delete, participant changes) runs while holding that group's
/// map entry mutably, and [`LedgerStore::snapshot`] reads while holding it
/// shared. A snapshot therefore never observes an expense without its split
/// rows.
#[derive(Debug, Default)]
pub struct LedgerStore {
    max_participants: usize,
    groups: DashMap<GroupId, GroupRecord>,
    participants: DashMap<ParticipantId, ParticipantRecord>,
    expenses: DashMap<ExpenseId, ExpenseRecord>,
    splits: DashMap<SplitId, SplitRecord>,
}

impl LedgerStore {
    /// Creates an empty store with the given per-group participant cap.
    #[must_use]
    pub fn new(max_participants: usize) -> Self {
        Self {
            max_participants,
            ..Self::default()
        }
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Creates a new group.
    pub fn create_group(&self, name: &str, description: &str) -> AppResult<GroupRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Group name is required".into()));
        }

        let group = GroupRecord {
            id: GroupId::new(),
            name: name.to_string(),
            description: description.trim().to_string(),
            total_spent: Decimal::ZERO,
            created_at: Utc::now(),
        };
        debug!(group_id = %group.id, "group created");
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Fetches a group by id.
    pub fn group(&self, id: GroupId) -> AppResult<GroupRecord> {
        self.groups
            .get(&id)
            .map(|g| g.clone())
            .ok_or_else(|| AppError::NotFound(format!("Group {id}")))
    }

    /// Lists all groups, oldest first.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupRecord> {
        let mut all: Vec<GroupRecord> = self.groups.iter().map(|g| g.clone()).collect();
        all.sort_by_key(|g| g.id);
        all
    }

    /// Applies a partial update to a group.
    pub fn update_group(&self, id: GroupId, input: &UpdateGroupInput) -> AppResult<GroupRecord> {
        let mut group = self
            .groups
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Group {id}")))?;

        if let Some(name) = &input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Group name is required".into()));
            }
            group.name = name.to_string();
        }
        if let Some(description) = &input.description {
            group.description = description.trim().to_string();
        }
        Ok(group.clone())
    }

    /// Deletes a group and everything it owns.
    pub fn delete_group(&self, id: GroupId) -> AppResult<()> {
        let (_, group) = self
            .groups
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Group {id}")))?;

        let expense_ids: Vec<ExpenseId> = self
            .expenses
            .iter()
            .filter(|e| e.group_id == id)
            .map(|e| e.id)
            .collect();
        self.splits
            .retain(|_, s| !expense_ids.contains(&s.expense_id));
        self.expenses.retain(|_, e| e.group_id != id);
        self.participants.retain(|_, p| p.group_id != id);

        debug!(group_id = %group.id, "group deleted");
        Ok(())
    }

    /// Aggregated overview of a group: total spent plus member balances.
    pub fn group_summary(&self, id: GroupId) -> AppResult<GroupSummary> {
        let group = self.group(id)?;
        let balances = self.balances(id)?;
        Ok(GroupSummary {
            group_id: group.id,
            name: group.name,
            total_spent: round_amount(group.total_spent),
            participants: balances.into_values().collect(),
        })
    }

    // ========================================================================
    // Participants
    // ========================================================================

    /// Adds a participant to a group, enforcing the participant cap.
    pub fn add_participant(
        &self,
        group_id: GroupId,
        name: &str,
        email: Option<String>,
        color: Option<String>,
    ) -> AppResult<ParticipantRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Participant name is required".into()));
        }

        // Holding the group entry serializes membership changes per group.
        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id}")))?;

        let current = self
            .participants
            .iter()
            .filter(|p| p.group_id == group_id)
            .count();
        if current >= self.max_participants {
            return Err(AppError::Conflict(format!(
                "Maximum {} participants allowed in group",
                self.max_participants
            )));
        }

        let participant = ParticipantRecord {
            id: ParticipantId::new(),
            group_id: group.id,
            name: name.to_string(),
            email,
            color: color.unwrap_or_else(|| "#3498db".to_string()),
            created_at: Utc::now(),
        };
        self.participants
            .insert(participant.id, participant.clone());
        debug!(group_id = %group_id, participant_id = %participant.id, "participant added");
        Ok(participant)
    }

    /// Lists a group's participants in insertion order.
    pub fn participants(&self, group_id: GroupId) -> AppResult<Vec<ParticipantRecord>> {
        self.group(group_id)?;
        let mut members: Vec<ParticipantRecord> = self
            .participants
            .iter()
            .filter(|p| p.group_id == group_id)
            .map(|p| p.clone())
            .collect();
        members.sort_by_key(|p| p.id);
        Ok(members)
    }

    /// Fetches a participant by id.
    pub fn participant(&self, id: ParticipantId) -> AppResult<ParticipantRecord> {
        self.participants
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| AppError::NotFound(format!("Participant {id}")))
    }

    /// Applies a partial update to a participant.
    pub fn update_participant(
        &self,
        id: ParticipantId,
        input: &UpdateParticipantInput,
    ) -> AppResult<ParticipantRecord> {
        let mut participant = self
            .participants
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Participant {id}")))?;

        if let Some(name) = &input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Participant name is required".into()));
            }
            participant.name = name.to_string();
        }
        if let Some(email) = &input.email {
            participant.email = Some(email.clone());
        }
        if let Some(color) = &input.color {
            participant.color = color.clone();
        }
        Ok(participant.clone())
    }

    /// Removes a participant from their group along with their split rows.
    ///
    /// Expenses they paid stay on record; aggregation skips rows that
    /// reference a participant no longer in the group.
    pub fn remove_participant(&self, id: ParticipantId) -> AppResult<()> {
        let participant = self.participant(id)?;

        let _group = self
            .groups
            .get_mut(&participant.group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {}", participant.group_id)))?;

        self.splits.retain(|_, s| s.participant_id != id);
        self.participants.remove(&id);
        debug!(participant_id = %id, "participant removed");
        Ok(())
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    /// Records an expense and its computed split rows.
    ///
    /// The split calculator runs first; nothing is persisted if it rejects
    /// the request. All rows are inserted under the group's entry lock so a
    /// concurrent snapshot sees either none or all of them.
    pub fn create_expense(&self, input: CreateExpenseInput) -> AppResult<ExpenseWithSplits> {
        let payer = self.participant(input.payer_id)?;
        if payer.group_id != input.group_id {
            return Err(AppError::Validation(
                "Payer does not belong to this group".into(),
            ));
        }

        let mut group = self
            .groups
            .get_mut(&input.group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {}", input.group_id)))?;

        let amount = round_amount(input.amount);
        let shares = compute_shares(amount, &input.split)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let now = Utc::now();
        let expense = ExpenseRecord {
            id: ExpenseId::new(),
            group_id: input.group_id,
            payer_id: input.payer_id,
            amount,
            description: input.description.trim().to_string(),
            category: input.category.unwrap_or_else(|| "general".to_string()),
            policy: input.split.policy(),
            date: input.date.unwrap_or(now),
            created_at: now,
        };

        let splits: Vec<SplitRecord> = shares
            .into_iter()
            .map(|share| SplitRecord {
                id: SplitId::new(),
                expense_id: expense.id,
                participant_id: share.participant_id,
                share_amount: share.amount,
            })
            .collect();

        self.expenses.insert(expense.id, expense.clone());
        for split in &splits {
            self.splits.insert(split.id, split.clone());
        }
        group.total_spent += amount;

        debug!(expense_id = %expense.id, amount = %amount, "expense recorded");
        Ok(ExpenseWithSplits { expense, splits })
    }

    /// Lists a group's expenses with their splits, newest first.
    pub fn expenses(&self, group_id: GroupId) -> AppResult<Vec<ExpenseWithSplits>> {
        self.group(group_id)?;
        let mut records: Vec<ExpenseRecord> = self
            .expenses
            .iter()
            .filter(|e| e.group_id == group_id)
            .map(|e| e.clone())
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(records
            .into_iter()
            .map(|expense| {
                let splits = self.splits_for(expense.id);
                ExpenseWithSplits { expense, splits }
            })
            .collect())
    }

    /// Fetches a single expense with its splits.
    pub fn expense(&self, id: ExpenseId) -> AppResult<ExpenseWithSplits> {
        let expense = self
            .expenses
            .get(&id)
            .map(|e| e.clone())
            .ok_or_else(|| AppError::NotFound(format!("Expense {id}")))?;
        let splits = self.splits_for(id);
        Ok(ExpenseWithSplits { expense, splits })
    }

    /// Applies an expense edit, replacing its split rows.
    pub fn update_expense(
        &self,
        id: ExpenseId,
        input: UpdateExpenseInput,
    ) -> AppResult<ExpenseWithSplits> {
        let old = self
            .expenses
            .get(&id)
            .map(|e| e.clone())
            .ok_or_else(|| AppError::NotFound(format!("Expense {id}")))?;

        let mut group = self
            .groups
            .get_mut(&old.group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {}", old.group_id)))?;

        let amount = round_amount(input.amount.unwrap_or(old.amount));
        let shares = compute_shares(amount, &input.split)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut expense = old.clone();
        expense.amount = amount;
        expense.policy = input.split.policy();
        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }
        if let Some(category) = input.category {
            expense.category = category;
        }
        if let Some(date) = input.date {
            expense.date = date;
        }

        let splits: Vec<SplitRecord> = shares
            .into_iter()
            .map(|share| SplitRecord {
                id: SplitId::new(),
                expense_id: expense.id,
                participant_id: share.participant_id,
                share_amount: share.amount,
            })
            .collect();

        // Old split rows are replaced wholesale; an edit invalidates them.
        self.splits.retain(|_, s| s.expense_id != id);
        for split in &splits {
            self.splits.insert(split.id, split.clone());
        }
        self.expenses.insert(id, expense.clone());
        group.total_spent += amount - old.amount;

        debug!(expense_id = %id, "expense updated");
        Ok(ExpenseWithSplits { expense, splits })
    }

    /// Deletes an expense and its split rows.
    pub fn delete_expense(&self, id: ExpenseId) -> AppResult<()> {
        let expense = self
            .expenses
            .get(&id)
            .map(|e| e.clone())
            .ok_or_else(|| AppError::NotFound(format!("Expense {id}")))?;

        let mut group = self
            .groups
            .get_mut(&expense.group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {}", expense.group_id)))?;

        self.splits.retain(|_, s| s.expense_id != id);
        self.expenses.remove(&id);
        group.total_spent -= expense.amount;

        debug!(expense_id = %id, "expense deleted");
        Ok(())
    }

    /// Expenses a participant paid or shares in, newest first.
    pub fn participant_expenses(
        &self,
        group_id: GroupId,
        participant_id: ParticipantId,
    ) -> AppResult<ParticipantExpenses> {
        self.group(group_id)?;
        self.participant(participant_id)?;

        let mut paid = Vec::new();
        let mut shared = Vec::new();
        for expense in self.expenses.iter().filter(|e| e.group_id == group_id) {
            if expense.payer_id == participant_id {
                paid.push(expense.clone());
            }
            let in_split = self
                .splits
                .iter()
                .any(|s| s.expense_id == expense.id && s.participant_id == participant_id);
            if in_split {
                shared.push(expense.clone());
            }
        }
        paid.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        shared.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(ParticipantExpenses { paid, shared })
    }

    // ========================================================================
    // Snapshots for the engine
    // ========================================================================

    /// Builds a consistent snapshot of a group's ledger for the engine.
    pub fn snapshot(&self, group_id: GroupId) -> AppResult<LedgerSnapshot> {
        // Shared hold on the group entry blocks concurrent ledger mutations,
        // which all take it mutably.
        let _group = self
            .groups
            .get(&group_id)
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id}")))?;

        let mut participants: Vec<ParticipantRecord> = self
            .participants
            .iter()
            .filter(|p| p.group_id == group_id)
            .map(|p| p.clone())
            .collect();
        participants.sort_by_key(|p| p.id);

        let mut expenses: Vec<ExpenseRecord> = self
            .expenses
            .iter()
            .filter(|e| e.group_id == group_id)
            .map(|e| e.clone())
            .collect();
        expenses.sort_by_key(|e| e.id);
        let expense_ids: Vec<ExpenseId> = expenses.iter().map(|e| e.id).collect();

        let mut splits: Vec<SplitRecord> = self
            .splits
            .iter()
            .filter(|s| expense_ids.contains(&s.expense_id))
            .map(|s| s.clone())
            .collect();
        splits.sort_by_key(|s| s.id);

        Ok(LedgerSnapshot {
            participants: participants
                .into_iter()
                .map(|p| ledger::Participant {
                    id: p.id,
                    name: p.name,
                })
                .collect(),
            expenses: expenses
                .into_iter()
                .map(|e| ledger::Expense {
                    id: e.id,
                    payer_id: e.payer_id,
                    amount: e.amount,
                    policy: e.policy,
                })
                .collect(),
            splits: splits
                .into_iter()
                .map(|s| ledger::Split {
                    expense_id: s.expense_id,
                    participant_id: s.participant_id,
                    share_amount: s.share_amount,
                })
                .collect(),
        })
    }

    /// Recomputes per-participant balances for a group.
    pub fn balances(
        &self,
        group_id: GroupId,
    ) -> AppResult<BTreeMap<ParticipantId, ParticipantBalance>> {
        let snapshot = self.snapshot(group_id)?;
        Ok(aggregate_balances(
            &snapshot.participants,
            &snapshot.expenses,
            &snapshot.splits,
        ))
    }

    fn splits_for(&self, expense_id: ExpenseId) -> Vec<SplitRecord> {
        let mut splits: Vec<SplitRecord> = self
            .splits
            .iter()
            .filter(|s| s.expense_id == expense_id)
            .map(|s| s.clone())
            .collect();
        splits.sort_by_key(|s| s.id);
        splits
    }
}
