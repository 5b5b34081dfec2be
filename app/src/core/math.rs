/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `numerator / denominator`, or `None` for an empty denominator.
pub fn ratio(numerator: f64, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_two_decimals() {
        assert_eq!(round_to(-1.0 / 3.0, 2), -0.33);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_to(100.0 / 3.0, 1), 33.3);
        assert_eq!(round_to(200.0 / 3.0, 1), 66.7);
    }

    #[test]
    fn test_ratio_of_empty_is_none() {
        assert_eq!(ratio(3.0, 0), None);
        assert_eq!(ratio(3.0, 4), Some(0.75));
    }
}
