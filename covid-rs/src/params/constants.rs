use crate::prelude::{Horizon, Real};

///////////////////////////////////////////////////////////////////////////////
// Default model constants
///////////////////////////////////////////////////////////////////////////////

/// Trailing window (days) used to estimate the current growth rate.
pub const GROWTH_WINDOW: usize = 5;

/// Average delay (days) between a case being reported and its death being
/// reported.
pub const DEATH_LAG: usize = 8;

/// Lag (days) after which a case is old enough to plausibly have resolved.
pub const RECOVERY_LAG: usize = 9;
pub const RECOVERY_LAGGED_RATE: Real = 0.07;

/// Constant-rate recovery of the simple SIR fallback.
pub const RECOVERY_RATE_SIMPLE: Real = 0.05;

pub const MIN_WINDOW_LAG: usize = 60;
pub const MIN_WINDOW_DEATHS: Real = 300.0;

/// Number of perturbed growth rates in the ensemble and the span of the
/// perturbation in units of the growth rate standard deviation.
pub const N_PERTURBATIONS: usize = 10;
pub const PERTURBATION_SPAN: Real = 1.0;

/// Daily cases after which a zero day is considered a missing measurement.
pub const BACKFILL_THRESHOLD: Real = 50.0;

/// Lag (days) used to report new cases and deaths.
pub const NEW_CASES_LAG: usize = 5;

pub const ICU_SPARE_CAPACITY_RATIO: Real = 0.3;

pub const PROJECTION_DAYS: [Horizon; 3] = [7, 14, 30];

///////////////////////////////////////////////////////////////////////////////
// Age adjusted reference data
///////////////////////////////////////////////////////////////////////////////

/// Number of 5-year age buckets (0-4, 5-9, ..., 95-99, 100+).
pub const AGE_BUCKETS: usize = 21;

/// Bucketed population counts or ratios.
pub type AgeDistribution5 = [Real; AGE_BUCKETS];

/// International infection fatality ratios for each 5-year bucket. The 80+
/// group is a single bucket in the source study and is repeated here.
pub const INTERNATIONAL_IFRS: AgeDistribution5 = [
    0.00003, 0.00001, 0.00001, 0.00003, 0.00006, 0.00013, 0.00024, 0.00040, 0.00075, 0.00121,
    0.00207, 0.00323, 0.00456, 0.01075, 0.01674, 0.03203, 0.08292, 0.08292, 0.08292, 0.08292,
    0.08292,
];

/// Ratio of reported cases requiring critical care in the reference region.
pub const ICU_SERIOUS_RATIO: Real = 0.044;

/// Testing bias of the reference region at the time the ICU ratio was measured.
pub const REFERENCE_TESTING_BIAS: Real = 14.0;

pub const REFERENCE_REGION: &str = "United Kingdom";
