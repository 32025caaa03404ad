use crate::{
    params::ModelParams,
    prelude::{Day, Real},
    utils::clamp_ratio,
};
use getset::Getters;
use serde::{Deserialize, Serialize};

/// Population fractions in each compartment. Susceptible is always derived
/// as `1 - active - recovered`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentState {
    pub susceptible: Real,
    pub active: Real,
    pub recovered: Real,
}

impl CompartmentState {
    pub fn from_active_recovered(active: Real, recovered: Real) -> Self {
        CompartmentState {
            susceptible: 1.0 - active - recovered,
            active,
            recovered,
        }
    }

    /// Fraction of the population that was ever infected.
    pub fn affected(&self) -> Real {
        1.0 - self.susceptible
    }
}

impl Default for CompartmentState {
    fn default() -> Self {
        CompartmentState::from_active_recovered(0.0, 0.0)
    }
}

/// Estimated cases as fractions of the population, clamped to [0, 1] to
/// protect against testing bias over-inflation. Regions without a valid
/// population yield zeros.
pub fn case_fractions(cases: &[Real], population: Real) -> Vec<Real> {
    if !(population > 0.0) || !population.is_finite() {
        return vec![0.0; cases.len()];
    }
    cases.iter().map(|c| clamp_ratio(c / population)).collect()
}

/// Day by day Active and Recovered fractions over the observed history.
#[derive(Debug, Clone, PartialEq, Default, Getters)]
#[getset(get = "pub")]
pub struct CompartmentHistory {
    active: Vec<Real>,
    recovered: Vec<Real>,
}

impl CompartmentHistory {
    /// Build history from explicit series. Both series are truncated to the
    /// shortest length.
    pub fn from_parts(mut active: Vec<Real>, mut recovered: Vec<Real>) -> Self {
        let n = active.len().min(recovered.len());
        active.truncate(n);
        recovered.truncate(n);
        CompartmentHistory { active, recovered }
    }

    /// Walk the case history forward, moving each day a fixed share of the
    /// gap between lagged cases and current recoveries into Recovered.
    ///
    /// Cases older than `recovery_lag` days are a proxy for infections that
    /// could have resolved. Lagged terms before the start of the series count
    /// as zero. Recoveries never exceed the current case fraction.
    pub fn reconstruct(case_fractions: &[Real], params: &ModelParams) -> Self {
        let lag = params.recovery_lag();
        let rate = params.recovery_lagged_rate();
        let n = case_fractions.len();
        let mut active = Vec::with_capacity(n);
        let mut recovered: Vec<Real> = Vec::with_capacity(n);

        for (day, &cases) in case_fractions.iter().enumerate() {
            let prev = recovered.last().cloned().unwrap_or(0.0);
            let lagged = if day >= lag { case_fractions[day - lag] } else { 0.0 };
            let rec = (prev + (lagged - prev) * rate).max(0.0).min(cases).min(1.0);
            recovered.push(rec);
            active.push(cases - rec);
        }
        CompartmentHistory { active, recovered }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn susceptible(&self) -> Vec<Real> {
        self.active
            .iter()
            .zip(self.recovered.iter())
            .map(|(a, r)| 1.0 - a - r)
            .collect()
    }

    pub fn state(&self, day: Day) -> Option<CompartmentState> {
        let active = *self.active.get(day)?;
        let recovered = *self.recovered.get(day)?;
        Some(CompartmentState::from_active_recovered(active, recovered))
    }

    /// Latest state or an all-susceptible population for empty histories.
    pub fn last(&self) -> CompartmentState {
        match self.len() {
            0 => CompartmentState::default(),
            n => self.state(n - 1).unwrap_or_default(),
        }
    }
}
