use super::{CompartmentHistory, CompartmentState};
use crate::{
    params::ModelParams,
    prelude::{Day, Real},
};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

/// Discrete time SIR model with a lagged empirical recovery estimator.
///
/// Recoveries use the Active fraction `recovery_lag` days ago, capped by a
/// constant-rate recovery of the current Active fraction. The cap matters on
/// declining slopes, where the lagged estimate would recover people faster
/// than plausible.
#[derive(Debug, Copy, Clone, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SirModel {
    transmission_rate: Real,
    recovery_lag: usize,
    recovery_lagged_rate: Real,
    recovery_rate_simple: Real,
}

impl SirModel {
    pub fn new(transmission_rate: Real, params: &ModelParams) -> Self {
        SirModel {
            transmission_rate,
            recovery_lag: params.recovery_lag(),
            recovery_lagged_rate: params.recovery_lagged_rate(),
            recovery_rate_simple: params.recovery_rate_simple(),
        }
    }

    /// Advance state by one day. `active_lagged` is the Active fraction
    /// `recovery_lag` days before the current state (zero if unknown).
    pub fn step(&self, state: CompartmentState, active_lagged: Real) -> CompartmentState {
        let CompartmentState {
            susceptible,
            active,
            recovered,
        } = state;

        let delta_rec_lagged = active_lagged * self.recovery_lagged_rate;
        let delta_rec_simple = active * self.recovery_rate_simple;
        let delta_rec = delta_rec_lagged.min(delta_rec_simple);
        let new_recovered = recovered + delta_rec;

        let delta_infected = active * susceptible.max(0.0) * self.transmission_rate;
        let new_active = (active + delta_infected - delta_rec)
            .min(1.0 - new_recovered)
            .max(0.0);

        CompartmentState::from_active_recovered(new_active, new_recovered)
    }

    /// Run model for `n_days` starting from the last state of history.
    ///
    /// The returned trajectory starts at the last historical day (day 0) and
    /// has `n_days + 1` points.
    pub fn project(&self, history: &CompartmentHistory, n_days: Day) -> Trajectory {
        let mut active: Vec<Real> = history.active().clone();
        let start = history.len().max(1) - 1;
        let mut state = history.last();
        if active.is_empty() {
            active.push(state.active);
        }

        let mut out = Trajectory::with_capacity(n_days + 1);
        out.push(state);
        for t in start..start + n_days {
            let lagged = if t >= self.recovery_lag {
                active[t - self.recovery_lag]
            } else {
                0.0
            };
            state = self.step(state, lagged);
            active.push(state.active);
            out.push(state);
        }
        return out;
    }
}

/// Compartment fractions for consecutive days.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct Trajectory {
    susceptible: Vec<Real>,
    active: Vec<Real>,
    recovered: Vec<Real>,
}

impl Trajectory {
    pub fn with_capacity(n: usize) -> Self {
        Trajectory {
            susceptible: Vec::with_capacity(n),
            active: Vec::with_capacity(n),
            recovered: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, state: CompartmentState) {
        self.susceptible.push(state.susceptible);
        self.active.push(state.active);
        self.recovered.push(state.recovered);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn state(&self, day: Day) -> Option<CompartmentState> {
        Some(CompartmentState {
            susceptible: *self.susceptible.get(day)?,
            active: *self.active.get(day)?,
            recovered: *self.recovered.get(day)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn flat_history(active: Real, recovered: Real, days: usize) -> CompartmentHistory {
        CompartmentHistory::from_parts(vec![active; days], vec![recovered; days])
    }

    #[test]
    fn step_without_lagged_actives_does_not_recover() {
        let model = SirModel::new(0.0, &ModelParams::default());
        let state = CompartmentState::from_active_recovered(0.02, 0.08);
        let next = model.step(state, 0.0);
        assert_eq!(next, state);
    }

    #[test]
    fn recovery_is_capped_by_simple_rate() {
        let model = SirModel::new(0.0, &ModelParams::default());
        let state = CompartmentState::from_active_recovered(0.01, 0.1);
        // lagged estimate 0.5 * 0.07 is far above 0.01 * 0.05
        let next = model.step(state, 0.5);
        assert_approx_eq!(next.recovered, 0.1 + 0.01 * 0.05);
        assert_approx_eq!(next.active, 0.01 - 0.01 * 0.05);
    }

    #[test]
    fn infections_follow_transmission_rate() {
        let model = SirModel::new(0.5, &ModelParams::default());
        let state = CompartmentState::from_active_recovered(0.1, 0.0);
        let next = model.step(state, 0.0);
        assert_approx_eq!(next.active, 0.1 + 0.1 * 0.9 * 0.5);
        assert_approx_eq!(next.susceptible, 1.0 - next.active);
    }

    #[test]
    fn projection_keeps_compartments_normalized() {
        let model = SirModel::new(2.0, &ModelParams::default());
        let traj = model.project(&flat_history(0.05, 0.1, 30), 60);
        assert_eq!(traj.len(), 61);
        for d in 0..traj.len() {
            let st = traj.state(d).unwrap();
            assert_approx_eq!(st.susceptible + st.active + st.recovered, 1.0);
            assert!(st.susceptible >= -1e-12);
            assert!(st.active >= 0.0);
        }
    }

    #[test]
    fn projection_of_empty_history_stays_empty() {
        let model = SirModel::new(1.0, &ModelParams::default());
        let traj = model.project(&CompartmentHistory::default(), 10);
        assert_eq!(traj.len(), 11);
        assert!(traj.active().iter().all(|&a| a == 0.0));
        assert!(traj.susceptible().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn negative_transmission_never_yields_negative_actives() {
        let model = SirModel::new(-5.0, &ModelParams::default());
        let traj = model.project(&flat_history(0.02, 0.08, 15), 30);
        assert!(traj.active().iter().all(|&a| a >= 0.0));
    }
}
