//! Pairwise balance resolution between two participants.

pub mod resolver;

pub use resolver::{PairBalance, resolve_pair};
