//! Level curves and percent-to-next-level math.

/// Experience needed to reach `level`, with the curve flattened above
/// `max_level`.
///
/// `((50·l³ − 150·l² + 400·l) / 3)` with `l = level − 1`.
pub fn exp_for_level(level: u32, max_level: u32) -> u64 {
    let l = u128::from(level.min(max_level).saturating_sub(1));
    let exp = (50 * l * l * l + 400 * l - 150 * l * l) / 3;
    u64::try_from(exp).unwrap_or(u64::MAX)
}

/// Progress of `count` toward `next`, in percent with two decimals.
///
/// Returns 0 when `next` is 0 or the result would exceed 100.
pub fn percent_level(count: u64, next: u64) -> f64 {
    if next == 0 {
        return 0.0;
    }
    let result = (count as f64 * 100.0 / next as f64 * 100.0).round() / 100.0;
    if result > 100.0 { 0.0 } else { result }
}

/// Base speed a character of `level` walks with.
pub fn base_speed_for_level(vocation_speed: u32, level: u32) -> u32 {
    vocation_speed.saturating_add(2 * level.saturating_sub(1))
}

/// Base speed forced by `SET_MAX_SPEED`.
pub const MAX_BASE_SPEED: u32 = 1_500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_curve_matches_known_levels() {
        assert_eq!(exp_for_level(1, 2_000), 0);
        assert_eq!(exp_for_level(2, 2_000), 100);
        assert_eq!(exp_for_level(8, 2_000), 4_200);
        assert_eq!(exp_for_level(10, 2_000), 9_300);
        assert_eq!(exp_for_level(100, 2_000), 15_694_800);
    }

    #[test]
    fn experience_curve_plateaus_at_max_level() {
        assert_eq!(exp_for_level(51, 50), exp_for_level(50, 50));
    }

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(percent_level(1, 3), 33.33);
        assert_eq!(percent_level(50, 100), 50.0);
        assert_eq!(percent_level(5, 0), 0.0);
        assert_eq!(percent_level(150, 100), 0.0);
    }

    #[test]
    fn speed_grows_two_per_level() {
        assert_eq!(base_speed_for_level(220, 1), 220);
        assert_eq!(base_speed_for_level(220, 10), 238);
    }
}
