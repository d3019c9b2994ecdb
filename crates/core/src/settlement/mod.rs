//! Greedy settlement of outstanding net balances.

pub mod solver;

#[cfg(test)]
mod props;

pub use solver::{Settlement, solve_settlements};
