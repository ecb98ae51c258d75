//! Rounding rules shared by valuation, the rebalancing engine, and projection.
//!
//! Every currency amount that leaves a computation goes through
//! [`round_currency`]; every share delta goes through [`round_shares`].
//! Displayed share counts use [`floor_shares`].

/// Absolute tolerance for percentage totals (target sums, UI recomputation).
pub const TARGET_SUM_TOLERANCE: f64 = 0.01;

/// Round to 2 decimals, half away from zero.
///
/// A relative nudge absorbs binary representation error so that values
/// such as `1.005` round the way they are written.
#[inline]
pub fn round_currency(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scaled = x * 100.0;
    let nudged = scaled + scaled.signum() * scaled.abs().max(1.0) * f64::EPSILON * 4.0;
    nudged.round() / 100.0
}

/// Round a share quantity to the nearest whole share, half up.
///
/// Exact halves round toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
#[inline]
pub fn round_shares(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Whole shares held, rounding fractional holdings down.
#[inline]
pub fn floor_shares(x: f64) -> i64 {
    x.floor() as i64
}

/// Whether a set of target percentages sums to 100 within tolerance.
#[inline]
pub fn targets_sum_to_100(sum: f64) -> bool {
    (sum - 100.0).abs() <= TARGET_SUM_TOLERANCE
}

/// `part / total * 100`, rounded for display; 0 when the total is 0.
#[inline]
pub fn percentage_of(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round_currency(part / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_half_away_from_zero() {
        assert_eq!(round_currency(1.005), 1.01);
        assert_eq!(round_currency(2.675), 2.68);
        assert_eq!(round_currency(-1.005), -1.01);
        assert_eq!(round_currency(10.0), 10.0);
        assert_eq!(round_currency(0.0), 0.0);
        assert_eq!(round_currency(1234.5649), 1234.56);
    }

    #[test]
    fn shares_half_up() {
        assert_eq!(round_shares(2.5), 3);
        assert_eq!(round_shares(2.49), 2);
        assert_eq!(round_shares(-2.5), -2);
        assert_eq!(round_shares(-2.51), -3);
        assert_eq!(round_shares(-3.333), -3);
        assert_eq!(round_shares(0.0), 0);
    }

    #[test]
    fn floor_is_toward_negative() {
        assert_eq!(floor_shares(10.9), 10);
        assert_eq!(floor_shares(0.2), 0);
    }

    #[test]
    fn target_tolerance() {
        assert!(targets_sum_to_100(100.0));
        assert!(targets_sum_to_100(99.995));
        assert!(targets_sum_to_100(100.005));
        assert!(!targets_sum_to_100(99.98));
        assert!(!targets_sum_to_100(0.0));
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
        assert_eq!(percentage_of(1500.0, 2000.0), 75.0);
        assert_eq!(percentage_of(1.0, 3.0), 33.33);
    }
}
