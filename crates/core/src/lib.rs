//! Balance and settlement engine for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It consumes immutable ledger snapshots (participants, expenses, splits) and
//! derives balances and settlement plans from them; it holds no state of its own.
//!
//! # Modules
//!
//! - `split` - Share calculation for equal/custom/percentage split policies
//! - `ledger` - Snapshot types and per-participant balance aggregation
//! - `settlement` - Greedy debt netting into a minimal payment list
//! - `bilateral` - Pairwise owed/owing resolution between two participants

pub mod bilateral;
pub mod ledger;
pub mod settlement;
pub mod split;
