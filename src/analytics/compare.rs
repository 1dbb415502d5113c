//! Period-over-period comparison

use crate::models::Money;

/// Percentage change from `previous` to `current`
///
/// A zero baseline yields 100 for any current value, zero included.
/// Otherwise the result keeps its sign: a decrease is negative.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 100.0;
    }
    ((current - previous) / previous) * 100.0
}

/// [`percent_change`] over money amounts
pub fn percent_change_money(current: Money, previous: Money) -> f64 {
    percent_change(current.to_f64(), previous.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_baseline_is_full_swing() {
        for current in [0.0, 1.0, -250.0, 1e9] {
            assert_eq!(percent_change(current, 0.0), 100.0);
        }
    }

    #[test]
    fn test_drop_to_zero() {
        assert_eq!(percent_change(0.0, 100.0), -100.0);
    }

    #[test]
    fn test_sign_is_kept() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(75.0, 100.0), -25.0);
        assert_eq!(percent_change(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_negative_baseline() {
        // Balance going from -100 to -50 divides by the negative baseline
        assert_eq!(percent_change(-50.0, -100.0), -50.0);
    }

    #[test]
    fn test_money_variant() {
        assert_eq!(
            percent_change_money(Money::from_units(450), Money::from_units(400)),
            12.5
        );
        assert_eq!(percent_change_money(Money::zero(), Money::zero()), 100.0);
    }
}
