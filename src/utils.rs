//! Utility functions for the rankings engine

use chrono::{Local, NaiveDate};

/// Today's date in local time, used when no duel date is given
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Logistic function
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Quantile `q` of `values` with linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Median of `values`, `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
        assert!((sigmoid(1.0) + sigmoid(-1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1000.0, 1200.0, 1100.0, 900.0, 1300.0];
        assert_eq!(quantile(&values, 0.0), Some(900.0));
        assert_eq!(quantile(&values, 1.0), Some(1300.0));
        assert_eq!(quantile(&values, 0.5), Some(1100.0));
        // position 0.2 * 4 = 0.8 between 900 and 1000
        assert!((quantile(&values, 0.2).unwrap() - 980.0).abs() < 1e-9);
        // position 0.75 * 4 = 3.0 exactly
        assert_eq!(quantile(&values, 0.75), Some(1200.0));
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[1.0, 4.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }
}
