//! In-memory ledger store for Divvy.
//!
//! This crate owns the persisted shape of groups, participants, expenses and
//! split rows, and hands the engine immutable [`divvy_core::ledger::LedgerSnapshot`]s.
//! Expense create/edit runs the split calculator and writes the expense and
//! all of its split rows under the owning group's lock, so snapshots never
//! observe an expense without its splits.

pub mod records;
pub mod store;

pub use records::{
    ExpenseRecord, ExpenseWithSplits, GroupRecord, GroupSummary, ParticipantExpenses,
    ParticipantRecord, SplitRecord,
};
pub use store::{
    CreateExpenseInput, LedgerStore, UpdateExpenseInput, UpdateGroupInput, UpdateParticipantInput,
};
