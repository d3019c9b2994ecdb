//! Share calculation with remainder absorption.
//!
//! Every policy rounds each share to two decimal places except the *last*
//! entry in the caller's list, which receives the exact remainder
//! (`amount - sum of prior rounded shares`). This guarantees the shares sum
//! to the expense amount exactly regardless of rounding drift. The ordering
//! of the input list is therefore part of the contract: the last participant
//! absorbs the rounding remainder, deterministically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{EPSILON, ParticipantId, round_amount};

use super::error::SplitError;

/// Split policy tag persisted on an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Amount divided evenly across participants.
    Equal,
    /// Caller supplies explicit per-participant amounts.
    Custom,
    /// Caller supplies per-participant percentages of the amount.
    Percentage,
}

impl std::fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Custom => write!(f, "custom"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

impl std::str::FromStr for SplitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            "percentage" => Ok(Self::Percentage),
            _ => Err(format!("Unknown split policy: {s}")),
        }
    }
}

/// A caller-declared custom share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomShare {
    /// Participant receiving this share.
    pub participant_id: ParticipantId,
    /// Declared share amount.
    pub amount: Decimal,
}

/// A caller-declared percentage share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageShare {
    /// Participant receiving this share.
    pub participant_id: ParticipantId,
    /// Declared percentage of the expense amount (0-100).
    pub percentage: Decimal,
}

/// Policy-specific split input, in the caller's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "policy", content = "entries")]
pub enum SplitSpec {
    /// Equal split across the listed participants.
    Equal(Vec<ParticipantId>),
    /// Explicit per-participant amounts.
    Custom(Vec<CustomShare>),
    /// Per-participant percentages of the amount.
    Percentage(Vec<PercentageShare>),
}

impl SplitSpec {
    /// Returns the policy tag for this spec.
    #[must_use]
    pub const fn policy(&self) -> SplitPolicy {
        match self {
            Self::Equal(_) => SplitPolicy::Equal,
            Self::Custom(_) => SplitPolicy::Custom,
            Self::Percentage(_) => SplitPolicy::Percentage,
        }
    }

    /// Number of participants in the spec.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Equal(ids) => ids.len(),
            Self::Custom(entries) => entries.len(),
            Self::Percentage(entries) => entries.len(),
        }
    }

    /// Returns true if the spec names no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A computed per-participant share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Participant owing this share.
    pub participant_id: ParticipantId,
    /// Share amount, rounded to two decimal places.
    pub amount: Decimal,
}

/// Computes per-participant shares for an expense.
///
/// Pure function: the output depends only on `amount` and `spec`. The sum of
/// the returned shares equals `amount` exactly.
///
/// # Errors
///
/// - [`SplitError::NonPositiveAmount`] if `amount <= 0`
/// - [`SplitError::NoParticipants`] if the spec lists nobody
/// - [`SplitError::NegativeShare`] if a declared custom amount is negative
/// - [`SplitError::PercentageOutOfRange`] if a declared percentage falls
///   outside 0-100
/// - [`SplitError::ShareTotalMismatch`] if declared custom shares diverge
///   from `amount` by more than 0.01
/// - [`SplitError::PercentageTotalMismatch`] if declared percentages leave
///   more than 0.01 of `amount` unallocated
pub fn compute_shares(amount: Decimal, spec: &SplitSpec) -> Result<Vec<Share>, SplitError> {
    if amount <= Decimal::ZERO {
        return Err(SplitError::NonPositiveAmount);
    }
    if spec.is_empty() {
        return Err(SplitError::NoParticipants);
    }

    // Boundary validation happens before any remainder adjustment, so the
    // remainder only ever absorbs rounding noise, never caller mistakes.
    match spec {
        SplitSpec::Equal(ids) => {
            let count = Decimal::from(ids.len());
            let raw = amount / count;
            Ok(allocate(amount, ids.iter().map(|id| (*id, raw))))
        }
        SplitSpec::Custom(entries) => {
            if let Some(entry) = entries.iter().find(|e| e.amount < Decimal::ZERO) {
                return Err(SplitError::NegativeShare(entry.amount));
            }
            let declared: Decimal = entries.iter().map(|e| e.amount).sum();
            if (declared - amount).abs() > EPSILON {
                return Err(SplitError::ShareTotalMismatch {
                    declared: round_amount(declared),
                    expected: amount,
                });
            }
            Ok(allocate(
                amount,
                entries.iter().map(|e| (e.participant_id, e.amount)),
            ))
        }
        SplitSpec::Percentage(entries) => {
            let hundred = Decimal::ONE_HUNDRED;
            if let Some(entry) = entries
                .iter()
                .find(|e| e.percentage < Decimal::ZERO || e.percentage > hundred)
            {
                return Err(SplitError::PercentageOutOfRange(entry.percentage));
            }
            let declared_pct: Decimal = entries.iter().map(|e| e.percentage).sum();
            if (amount * declared_pct / hundred - amount).abs() > EPSILON {
                return Err(SplitError::PercentageTotalMismatch {
                    declared: declared_pct,
                    expected: amount,
                });
            }
            Ok(allocate(
                amount,
                entries
                    .iter()
                    .map(|e| (e.participant_id, amount * e.percentage / hundred)),
            ))
        }
    }
}

/// Rounds each raw share to two decimals, forcing the last entry to the
/// exact remainder so the total equals `amount`.
fn allocate(
    amount: Decimal,
    raw_shares: impl ExactSizeIterator<Item = (ParticipantId, Decimal)>,
) -> Vec<Share> {
    let count = raw_shares.len();
    let mut remaining = amount;
    let mut shares = Vec::with_capacity(count);

    for (index, (participant_id, raw)) in raw_shares.enumerate() {
        let share = if index == count - 1 {
            round_amount(remaining)
        } else {
            round_amount(raw)
        };
        remaining -= share;
        shares.push(Share {
            participant_id,
            amount: share,
        });
    }

    shares
}
