use crate::prelude::Real;

/// Guarded division: return `default` when the result would not be a finite
/// number (zero or near-zero denominators, NaN inputs).
#[inline]
pub fn safe_div(num: Real, den: Real, default: Real) -> Real {
    let value = num / den;
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Clamp value to the [0, 1] interval. NaNs become zero.
#[inline]
pub fn clamp_ratio(x: Real) -> Real {
    if x.is_nan() {
        0.0
    } else {
        x.max(0.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_division() {
        assert_eq!(safe_div(1.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0, 1.0), 1.0);
        assert_eq!(safe_div(1.0, 4.0, 0.0), 0.25);
    }

    #[test]
    fn ratios_are_clamped() {
        assert_eq!(clamp_ratio(1.5), 1.0);
        assert_eq!(clamp_ratio(-0.1), 0.0);
        assert_eq!(clamp_ratio(Real::NAN), 0.0);
    }
}
