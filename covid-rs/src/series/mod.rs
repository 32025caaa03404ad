//! Daily series manipulation: day diffs, cumulative sums and repair of
//! reporting gaps.
mod backfill;

pub use backfill::*;

use crate::prelude::Real;

/// Convert a cumulative series into daily increments. The first value is
/// kept as-is since there is no previous day to subtract.
pub fn daily_diffs(cumulative: &[Real]) -> Vec<Real> {
    (0..cumulative.len())
        .map(|i| {
            if i == 0 {
                cumulative[0]
            } else {
                cumulative[i] - cumulative[i - 1]
            }
        })
        .collect()
}

/// Cumulative sum, inverse of daily_diffs().
pub fn cumsum(data: &[Real]) -> Vec<Real> {
    let mut sum = 0.0;
    data.iter()
        .map(|v| {
            sum += v;
            sum
        })
        .collect()
}

/// Increment between the last value and the value `lag` days before it,
/// clipped at zero. Short series count from zero.
pub fn recent_increase(cumulative: &[Real], lag: usize) -> Real {
    let n = cumulative.len();
    match n {
        0 => 0.0,
        _ => {
            let prev = if n > lag { cumulative[n - 1 - lag] } else { 0.0 };
            (cumulative[n - 1] - prev).max(0.0)
        }
    }
}

/// Index of the last day with a positive daily increment.
pub fn last_increase(cumulative: &[Real]) -> Option<usize> {
    daily_diffs(cumulative)
        .iter()
        .rposition(|&x| x > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffs_and_cumsum_are_inverse() {
        let data = vec![3.0, 5.0, 5.0, 4.0, 10.0];
        let diffs = daily_diffs(&data);
        assert_eq!(diffs, vec![3.0, 2.0, 0.0, -1.0, 6.0]);
        assert_eq!(cumsum(&diffs), data);
    }

    #[test]
    fn recent_increase_is_clipped() {
        let data = vec![0.0, 10.0, 20.0, 15.0];
        assert_eq!(recent_increase(&data, 1), 0.0);
        assert_eq!(recent_increase(&data, 2), 5.0);
        assert_eq!(recent_increase(&data, 10), 15.0);
        assert_eq!(recent_increase(&[], 5), 0.0);
    }

    #[test]
    fn last_positive_day() {
        assert_eq!(last_increase(&[1.0, 2.0, 2.0, 1.0]), Some(1));
        assert_eq!(last_increase(&[0.0, 0.0]), None);
    }
}
