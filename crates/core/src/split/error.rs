//! Split calculation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when validating a split request.
///
/// All variants are detected at the call boundary, before any share is
/// computed; a failed split produces no partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Expense amount must be strictly positive.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// A split needs at least one participant.
    #[error("At least one participant is required")]
    NoParticipants,

    /// A declared custom share is negative.
    #[error("Share amount {0} must not be negative")]
    NegativeShare(Decimal),

    /// A declared percentage is outside 0-100.
    #[error("Percentage {0} must be between 0 and 100")]
    PercentageOutOfRange(Decimal),

    /// Declared custom shares do not add up to the expense amount.
    #[error("Declared shares total {declared} does not match expense amount {expected}")]
    ShareTotalMismatch {
        /// Sum of the caller-declared share amounts.
        declared: Decimal,
        /// The expense amount the shares must cover.
        expected: Decimal,
    },

    /// Declared percentages do not allocate the full expense amount.
    #[error("Percentages totalling {declared}% do not allocate expense amount {expected}")]
    PercentageTotalMismatch {
        /// Sum of the caller-declared percentages.
        declared: Decimal,
        /// The expense amount the percentages must cover.
        expected: Decimal,
    },
}
