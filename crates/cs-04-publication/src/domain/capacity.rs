//! Cascade capacity and timing helpers.

/// Capacity handed to the cascade builder: `max(valid, invalid / 2)`.
///
/// The division is floating point, so three invalid ids alone give `1.5`.
pub fn r_hat(valid_count: usize, invalid_count: usize) -> f64 {
    (valid_count as f64).max(invalid_count as f64 / 2.0)
}

/// Round seconds to four decimals.
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_hat_prefers_valid_count() {
        assert_eq!(r_hat(2, 1), 2.0);
        assert_eq!(r_hat(10, 4), 10.0);
        assert_eq!(r_hat(10, 16), 10.0);
    }

    #[test]
    fn test_r_hat_half_of_invalid() {
        assert_eq!(r_hat(1, 10), 5.0);
        assert_eq!(r_hat(3, 20), 10.0);
        assert_eq!(r_hat(0, 3), 1.5);
        assert_eq!(r_hat(0, 0), 0.0);
    }

    #[test]
    fn test_round_seconds() {
        assert_eq!(round_seconds(1.234_56), 1.2346);
        assert_eq!(round_seconds(0.000_04), 0.0);
    }
}
