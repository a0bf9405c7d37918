//! Experience leveling engine.
//!
//! Pure state-transition logic: accumulated experience rolls over into
//! level-ups until the remainder is below the next threshold. No side
//! effects, no I/O; the lifecycle coordinator pre-validates inputs.

/// Experience required to advance from `level` to `level + 1`.
///
/// Levels 1-5 use a hand-tuned table; from level 6 on the curve is
/// linear (`level * 100 - 300`). Positive for every `level >= 1`, which
/// is what guarantees [`apply_experience`] terminates.
pub fn required_exp(level: u32) -> u32 {
    debug_assert!(level >= 1, "levels start at 1");
    let needed = match level {
        0 | 1 => 50,
        2 => 75,
        3 => 100,
        4 => 150,
        5 => 200,
        n => n * 100 - 300,
    };
    // Guards the roll-over loop against a future bad threshold edit.
    assert!(needed > 0, "required_exp must be positive for level {level}");
    needed
}

/// Settle `gained` experience into `(level, experience)`.
///
/// Adds the gain, then repeatedly levels up while the pool covers the
/// current threshold. The returned pair is fully settled: the remaining
/// experience is strictly below `required_exp(returned_level)`, so no
/// partial level-up is ever left outstanding. `gained = 0` is a no-op
/// on an already-settled state.
pub fn apply_experience(level: u32, experience: u32, gained: u32) -> (u32, u32) {
    let mut level = level.max(1);
    let mut exp = experience + gained;

    // Terminates: each iteration strictly decreases exp by a positive
    // threshold, bounded by exp's finite starting value.
    while exp >= required_exp(level) {
        exp -= required_exp(level);
        level += 1;
    }

    (level, exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_table() {
        assert_eq!(required_exp(1), 50);
        assert_eq!(required_exp(2), 75);
        assert_eq!(required_exp(3), 100);
        assert_eq!(required_exp(4), 150);
        assert_eq!(required_exp(5), 200);
        assert_eq!(required_exp(6), 300);
        assert_eq!(required_exp(7), 400);
        assert_eq!(required_exp(20), 1700);
    }

    #[test]
    fn single_level_up_exact() {
        assert_eq!(apply_experience(1, 0, 50), (2, 0));
    }

    #[test]
    fn single_level_up_with_remainder() {
        assert_eq!(apply_experience(1, 10, 50), (2, 10));
    }

    #[test]
    fn chained_level_ups_settle_to_zero() {
        // 225 - 50 - 75 - 100 = 0: climbs 1 -> 4 exactly.
        assert_eq!(apply_experience(1, 0, 225), (4, 0));
    }

    #[test]
    fn below_threshold_is_unchanged() {
        assert_eq!(apply_experience(1, 0, 49), (1, 49));
        assert_eq!(apply_experience(3, 20, 0), (3, 20));
    }

    #[test]
    fn zero_gain_on_settled_state_is_fixed_point() {
        let (level, exp) = apply_experience(2, 60, 40);
        assert_eq!(apply_experience(level, exp, 0), (level, exp));
    }

    #[test]
    fn settles_across_linear_curve() {
        // From level 5 with 200 exp: levels to 6 with 0 left, and 300
        // more is needed for 7.
        assert_eq!(apply_experience(5, 0, 200), (6, 0));
        assert_eq!(apply_experience(6, 0, 299), (6, 299));
        assert_eq!(apply_experience(6, 0, 300), (7, 0));
    }
}
