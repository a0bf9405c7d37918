//! Property tests for the leveling curve and experience settlement.

use proptest::prelude::*;

use wellquest::{apply_experience, required_exp};

proptest! {
    /// Settlement always lands strictly below the next threshold.
    #[test]
    fn settled_experience_is_below_threshold(
        level in 1u32..50,
        experience in 0u32..10_000,
        gained in 0u32..100_000,
    ) {
        // Start from a settled state so the precondition holds.
        let experience = experience % required_exp(level);
        let (new_level, new_exp) = apply_experience(level, experience, gained);
        prop_assert!(new_exp < required_exp(new_level));
    }

    /// Earning experience never lowers the level.
    #[test]
    fn level_never_decreases(
        level in 1u32..50,
        experience in 0u32..10_000,
        gained in 0u32..100_000,
    ) {
        let experience = experience % required_exp(level);
        let (new_level, _) = apply_experience(level, experience, gained);
        prop_assert!(new_level >= level);
    }

    /// Gaining nothing changes nothing.
    #[test]
    fn zero_gain_is_a_fixed_point(level in 1u32..50, experience in 0u32..10_000) {
        let experience = experience % required_exp(level);
        prop_assert_eq!(apply_experience(level, experience, 0), (level, experience));
    }

    /// Total experience is conserved: the points spent climbing plus the
    /// leftover equal the starting experience plus the gain.
    #[test]
    fn experience_is_conserved(
        level in 1u32..50,
        experience in 0u32..10_000,
        gained in 0u32..100_000,
    ) {
        let experience = experience % required_exp(level);
        let (new_level, new_exp) = apply_experience(level, experience, gained);
        let spent: u32 = (level..new_level).map(required_exp).sum();
        prop_assert_eq!(spent + new_exp, experience + gained);
    }
}
