//! Share calculation for expense split policies.

pub mod calculator;
pub mod error;

#[cfg(test)]
mod props;

pub use calculator::{CustomShare, PercentageShare, Share, SplitPolicy, SplitSpec, compute_shares};
pub use error::SplitError;
