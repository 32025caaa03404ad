//! Model parameters.
//!
//! Every constant of the estimation and projection pipeline is exposed as a
//! named field of [`ModelParams`]. The defaults reproduce the reference
//! heuristics and are empirical tuning choices, not calibrated values.
mod constants;

pub use constants::*;

use crate::prelude::{Horizon, Real};
use getset::{CopyGetters, Getters, Setters};
use serde::{Deserialize, Serialize};

#[derive(CopyGetters, Getters, Setters, Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Trailing days used by the growth rate estimator.
    #[getset(get_copy = "pub", set = "pub")]
    growth_window: usize,

    /// Days between a reported case and its reported death.
    #[getset(get_copy = "pub", set = "pub")]
    death_lag: usize,

    #[getset(get_copy = "pub", set = "pub")]
    recovery_lag: usize,

    /// Fraction of the lagged gap between cases and recoveries that resolves
    /// each day.
    #[getset(get_copy = "pub", set = "pub")]
    recovery_lagged_rate: Real,

    /// Daily recovery rate of the simple SIR fallback. Caps the lagged
    /// estimate on declining slopes.
    #[getset(get_copy = "pub", set = "pub")]
    recovery_rate_simple: Real,

    #[getset(get_copy = "pub", set = "pub")]
    min_window_lag: usize,

    #[getset(get_copy = "pub", set = "pub")]
    min_window_deaths: Real,

    #[getset(get_copy = "pub", set = "pub")]
    n_perturbations: usize,

    #[getset(get_copy = "pub", set = "pub")]
    perturbation_span: Real,

    #[getset(get_copy = "pub", set = "pub")]
    backfill_threshold: Real,

    #[getset(get_copy = "pub", set = "pub")]
    new_cases_lag: usize,

    #[getset(get_copy = "pub", set = "pub")]
    icu_spare_capacity_ratio: Real,

    #[getset(get = "pub")]
    projection_days: Vec<Horizon>,
}

impl ModelParams {
    /// Set projection horizons. Horizons are kept sorted and unique; the last
    /// one bounds the length of the simulation.
    pub fn set_projection_days(&mut self, mut days: Vec<Horizon>) -> &mut Self {
        days.sort_unstable();
        days.dedup();
        self.projection_days = days;
        return self;
    }

    /// Number of days the simulator must run to cover every horizon.
    pub fn simulation_days(&self) -> Horizon {
        self.projection_days.iter().cloned().max().unwrap_or(0)
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            growth_window: GROWTH_WINDOW,
            death_lag: DEATH_LAG,
            recovery_lag: RECOVERY_LAG,
            recovery_lagged_rate: RECOVERY_LAGGED_RATE,
            recovery_rate_simple: RECOVERY_RATE_SIMPLE,
            min_window_lag: MIN_WINDOW_LAG,
            min_window_deaths: MIN_WINDOW_DEATHS,
            n_perturbations: N_PERTURBATIONS,
            perturbation_span: PERTURBATION_SPAN,
            backfill_threshold: BACKFILL_THRESHOLD,
            new_cases_lag: NEW_CASES_LAG,
            icu_spare_capacity_ratio: ICU_SPARE_CAPACITY_RATIO,
            projection_days: PROJECTION_DAYS.to_vec(),
        }
    }
}
