//! Numeric rounding and formatting for generated G-code
//!
//! Rounding is half-to-even at a fixed number of decimal places. Formatting
//! uses the shortest representation that round-trips, so `10.0` prints as
//! `10` and `0.4` as `0.4`, never in scientific notation.

/// Round `value` to `places` decimal places, ties to even
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    normalize_zero(scaled.round_ties_even() / factor)
}

/// Format a value the way it appears in a G-code word
pub fn format_decimal(value: f64) -> String {
    format!("{}", normalize_zero(value))
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(1499.6, 0), 1500.0);
        assert_eq!(round_to(0.123456789, 5), 0.12346);
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(10.0), "10");
        assert_eq!(format_decimal(0.4), "0.4");
        assert_eq!(format_decimal(1500.0), "1500");
        assert_eq!(format_decimal(-1.25), "-1.25");
        assert_eq!(format_decimal(0.00001), "0.00001");
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        assert_eq!(format_decimal(-0.0), "0");
        assert_eq!(format_decimal(round_to(-0.0001, 3)), "0");
    }
}
