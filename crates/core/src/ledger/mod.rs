//! Ledger snapshot types and balance aggregation.

pub mod aggregate;
pub mod types;

#[cfg(test)]
mod props;

pub use aggregate::aggregate_balances;
pub use types::{Expense, LedgerSnapshot, Participant, ParticipantBalance, Split};
