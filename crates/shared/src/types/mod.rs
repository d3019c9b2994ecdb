//! Common types used across the application.

pub mod amount;
pub mod id;

pub use amount::{EPSILON, SCALE, is_settled, round_amount};
pub use id::{ExpenseId, GroupId, ParticipantId, SplitId};
