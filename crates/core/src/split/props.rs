//! Property-based tests for the split calculator.
//!
//! - Share conservation: shares always sum exactly to the amount
//! - Remainder contract: only the last share deviates from the rounded quotient

use proptest::prelude::*;
use rust_decimal::Decimal;

use divvy_shared::types::ParticipantId;

use super::calculator::{PercentageShare, SplitSpec, compute_shares};

/// Strategy to generate positive two-decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate participant counts (1 to 50).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..50
}

/// Strategy to generate percentages that sum to exactly 100.
fn percentages_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    // Generate 2-10 random weights, normalize, and force the last entry to
    // close the gap so the declared total is exact.
    prop::collection::vec(1u32..100, 2..10).prop_map(|weights| {
        let sum: u32 = weights.iter().sum();
        let hundred = Decimal::from(100);
        let mut percentages: Vec<Decimal> = weights
            .iter()
            .map(|w| (hundred * Decimal::from(*w) / Decimal::from(sum)).round_dp(4))
            .collect();
        let allocated: Decimal = percentages.iter().copied().sum();
        if let Some(last) = percentages.last_mut() {
            *last += hundred - allocated;
        }
        percentages
    })
}

fn participants(n: usize) -> Vec<ParticipantId> {
    (0..n).map(|_| ParticipantId::new()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any amount and participant count, the equal shares sum exactly
    /// to the amount.
    #[test]
    fn prop_equal_shares_conserve_amount(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let shares = compute_shares(amount, &SplitSpec::Equal(participants(count))).unwrap();
        let total: Decimal = shares.iter().map(|s| s.amount).sum();
        prop_assert_eq!(total, amount);
    }

    /// Every share except the last equals the rounded exact quotient, and
    /// the last is exactly the leftover after those rounded shares.
    #[test]
    fn prop_equal_shares_follow_remainder_contract(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let rounded_quotient = (amount / Decimal::from(count)).round_dp(2);
        let shares = compute_shares(amount, &SplitSpec::Equal(participants(count))).unwrap();
        for share in &shares[..shares.len() - 1] {
            prop_assert_eq!(share.amount, rounded_quotient);
        }
        let prior: Decimal = shares[..shares.len() - 1].iter().map(|s| s.amount).sum();
        prop_assert_eq!(shares[shares.len() - 1].amount, amount - prior);
    }

    /// Percentage shares that declare a full 100% conserve the amount.
    #[test]
    fn prop_percentage_shares_conserve_amount(
        amount in positive_amount(),
        percentages in percentages_summing_to_100(),
    ) {
        let spec = SplitSpec::Percentage(
            percentages
                .iter()
                .map(|pct| PercentageShare {
                    participant_id: ParticipantId::new(),
                    percentage: *pct,
                })
                .collect(),
        );
        let shares = compute_shares(amount, &spec).unwrap();
        let total: Decimal = shares.iter().map(|s| s.amount).sum();
        prop_assert_eq!(total, amount);
    }

    /// Splitting is deterministic: the same input yields identical shares.
    #[test]
    fn prop_split_is_deterministic(
        amount in positive_amount(),
        count in participant_count(),
    ) {
        let spec = SplitSpec::Equal(participants(count));
        let first = compute_shares(amount, &spec).unwrap();
        let second = compute_shares(amount, &spec).unwrap();
        prop_assert_eq!(first, second);
    }
}
