use crate::{
    params::{AgeDistribution5, ICU_SERIOUS_RATIO, INTERNATIONAL_IFRS, REFERENCE_TESTING_BIAS},
    prelude::Real,
    utils::safe_div,
};

/// Infection fatality ratio of a population given its counts in 5-year age
/// buckets. Counts do not need to be normalized.
pub fn age_adjusted_ifr(counts: &AgeDistribution5) -> Real {
    let total: Real = counts.iter().sum();
    let weighted: Real = counts
        .iter()
        .zip(INTERNATIONAL_IFRS.iter())
        .map(|(n, ifr)| n * ifr)
        .sum();
    safe_div(weighted, total, 0.0)
}

/// Fraction of active infections requiring ICU care.
///
/// Scales the share of serious reported cases of the reference region by the
/// ratio between the region's IFR and the reference IFR. The reference ratio
/// is given for reported cases, so it is divided by the reference region's
/// testing bias at the time of measurement.
pub fn icu_need_coefficient(ifr: Real, reference_ifr: Real) -> Real {
    ICU_SERIOUS_RATIO * safe_div(ifr, reference_ifr, 0.0) / REFERENCE_TESTING_BIAS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AGE_BUCKETS;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn single_bucket_population() {
        let mut counts = [0.0; AGE_BUCKETS];
        counts[20] = 3.0;
        assert_approx_eq!(age_adjusted_ifr(&counts), 0.08292);
        assert_eq!(age_adjusted_ifr(&[0.0; AGE_BUCKETS]), 0.0);
    }

    #[test]
    fn older_populations_have_higher_ifr() {
        let mut young = [0.0; AGE_BUCKETS];
        let mut old = [0.0; AGE_BUCKETS];
        young[..10].iter_mut().for_each(|x| *x = 1.0);
        old[10..].iter_mut().for_each(|x| *x = 1.0);
        assert!(age_adjusted_ifr(&old) > age_adjusted_ifr(&young));
    }

    #[test]
    fn icu_coefficient_of_reference_region() {
        assert_approx_eq!(icu_need_coefficient(0.01, 0.01), 0.044 / 14.0);
        assert_eq!(icu_need_coefficient(0.01, 0.0), 0.0);
    }
}
