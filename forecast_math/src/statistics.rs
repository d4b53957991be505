//! Order statistics, moments and differencing
//!
//! Quantiles here are index lookups into a sorted copy, without
//! interpolation. The median of an even-length sample is the element at the
//! floor-midpoint index rather than the mean of the two middle elements.

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Return a sorted copy of `values` (total order, NaN sorts last)
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of an already sorted sample by index lookup: `sorted[floor(n * q)]`
pub fn quantile_by_index(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take a quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Quantile must be within [0, 1], got {}",
            q
        )));
    }

    let index = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    Ok(sorted[index])
}

/// Median of an already sorted sample: `sorted[n / 2]`
pub fn median_by_index(sorted: &[f64]) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the median of an empty sample".to_string(),
        ));
    }

    Ok(sorted[sorted.len() / 2])
}

/// Arithmetic mean, or `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Population standard deviation (divides by n), or `None` for an empty sample
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        1 => Some(0.0),
        _ => Some(values.iter().population_std_dev()),
    }
}

/// Standard deviation over the absolute mean, or `None` for an empty sample
///
/// A zero-mean sample has a cv of 0 when it is also constant and infinity
/// otherwise.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let std_dev = population_std_dev(values)?;
    if mean == 0.0 {
        return Some(if std_dev == 0.0 { 0.0 } else { f64::INFINITY });
    }
    Some(std_dev / mean.abs())
}

/// The trailing `len` values of `values` (all of them when shorter)
pub fn tail(values: &[f64], len: usize) -> &[f64] {
    &values[values.len().saturating_sub(len)..]
}

/// Apply first differences `order` times
///
/// Each pass shortens the series by one; a series that runs out of points
/// comes back empty.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Cumulatively add `differences` onto `start`, returning each running level
pub fn integrate(start: f64, differences: &[f64]) -> Vec<f64> {
    differences
        .iter()
        .scan(start, |level, diff| {
            *level += diff;
            Some(*level)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quantiles_use_index_lookup() {
        let s = sorted(&[7.0, 1.0, 5.0, 3.0, 9.0, 2.0, 8.0, 4.0]);
        assert_eq!(s, vec![1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 8.0, 9.0]);

        // n = 8: q1 -> index 2, q3 -> index 6
        assert_eq!(quantile_by_index(&s, 0.25).unwrap(), 3.0);
        assert_eq!(quantile_by_index(&s, 0.75).unwrap(), 8.0);
        assert_eq!(quantile_by_index(&s, 1.0).unwrap(), 9.0);
        assert!(quantile_by_index(&s, 1.5).is_err());
        assert!(quantile_by_index(&[], 0.5).is_err());
    }

    #[test]
    fn test_even_length_median_takes_upper_middle() {
        assert_eq!(median_by_index(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 3.0);
        assert_eq!(median_by_index(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert!(median_by_index(&[]).is_err());
    }

    #[test]
    fn test_moments() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values).unwrap(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_std_dev(&values).unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(population_std_dev(&[3.0]), Some(0.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(population_std_dev(&[]), None);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_abs_diff_eq!(
            coefficient_of_variation(&[-4.0, -6.0]).unwrap(),
            0.2,
            epsilon = 1e-12
        );
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), Some(0.0));
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), Some(f64::INFINITY));
        assert_eq!(coefficient_of_variation(&[]), None);
    }

    #[test]
    fn test_tail() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(tail(&values, 2), &[3.0, 4.0]);
        assert_eq!(tail(&values, 10), &values);
    }

    #[test]
    fn test_difference_and_integrate() {
        let values = [1.0, 4.0, 9.0, 16.0, 25.0];
        assert_eq!(difference(&values, 1), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&values, 2), vec![2.0, 2.0, 2.0]);
        assert_eq!(difference(&values, 0), values.to_vec());
        assert!(difference(&[1.0], 2).is_empty());

        assert_eq!(integrate(25.0, &[11.0, 13.0]), vec![36.0, 49.0]);
        assert!(integrate(1.0, &[]).is_empty());
    }
}
