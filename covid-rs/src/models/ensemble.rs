use super::{CompartmentHistory, SirModel, Trajectory};
use crate::{
    estimate::{growth_to_transmission_rate, GrowthRate},
    params::ModelParams,
    prelude::{Day, Real, INF},
};
use getset::{CopyGetters, Getters};
use log::*;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Pointwise center, minimum and maximum of one compartment over all
/// ensemble members.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct Envelope {
    center: Vec<Real>,
    min: Vec<Real>,
    max: Vec<Real>,
}

impl Envelope {
    /// Reduce a (member, day) table. Row 0 holds the center run.
    pub fn from_members(members: &Array2<Real>) -> Self {
        if members.nrows() == 0 {
            return Envelope::default();
        }
        Envelope {
            center: members.row(0).to_vec(),
            min: members.fold_axis(Axis(0), INF, |&acc, &x| acc.min(x)).to_vec(),
            max: members.fold_axis(Axis(0), -INF, |&acc, &x| acc.max(x)).to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.center.len()
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// Distance between maximum and minimum at the given day.
    pub fn spread(&self, day: Day) -> Real {
        match (self.max.get(day), self.min.get(day)) {
            (Some(hi), Some(lo)) => hi - lo,
            _ => 0.0,
        }
    }
}

/// A single simulation of the ensemble.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub growth_rate: Real,
    pub transmission_rate: Real,
}

/// Growth rates used by the perturbed members: evenly spaced over
/// `rate ± span * std`, endpoints included, clipped at zero.
pub fn perturbed_growth_rates(growth: GrowthRate, params: &ModelParams) -> Vec<Real> {
    let span = params.perturbation_span();
    Array1::linspace(-span, span, params.n_perturbations())
        .iter()
        .map(|&ratio| growth.perturbed(ratio))
        .collect()
}

/// Forward projections for the center growth rate and a grid of perturbed
/// growth rates.
///
/// The recurrence is nonlinear, so uncertainty is propagated by running the
/// whole grid and taking pointwise extremes rather than analytically.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Ensemble {
    #[getset(get = "pub")]
    members: Vec<Member>,
    #[getset(get_copy = "pub")]
    n_days: Day,
    susceptible: Array2<Real>,
    active: Array2<Real>,
    recovered: Array2<Real>,
}

impl Ensemble {
    /// Run all members from the last state of `history` for `n_days`.
    pub fn run(history: &CompartmentHistory, growth: GrowthRate, params: &ModelParams, n_days: Day) -> Self {
        let last = history.last();
        let members: Vec<Member> = std::iter::once(growth.rate)
            .chain(perturbed_growth_rates(growth, params))
            .map(|growth_rate| Member {
                growth_rate,
                transmission_rate: growth_to_transmission_rate(growth_rate, last.active, last.recovered),
            })
            .collect();

        let runs: Vec<Trajectory> = members
            .iter()
            .map(|m| SirModel::new(m.transmission_rate, params).project(history, n_days))
            .collect();
        trace!(target: "ensemble", "{} members, {} days", runs.len(), n_days);

        let shape = (runs.len(), n_days + 1);
        Ensemble {
            susceptible: Array2::from_shape_fn(shape, |(i, d)| runs[i].susceptible()[d]),
            active: Array2::from_shape_fn(shape, |(i, d)| runs[i].active()[d]),
            recovered: Array2::from_shape_fn(shape, |(i, d)| runs[i].recovered()[d]),
            members,
            n_days,
        }
    }

    /// Transmission rate of the center run.
    pub fn transmission_rate(&self) -> Real {
        self.members.first().map(|m| m.transmission_rate).unwrap_or(0.0)
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    pub fn susceptible(&self) -> Envelope {
        Envelope::from_members(&self.susceptible)
    }

    pub fn active(&self) -> Envelope {
        Envelope::from_members(&self.active)
    }

    pub fn recovered(&self) -> Envelope {
        Envelope::from_members(&self.recovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompartmentHistory;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    fn growing_history() -> CompartmentHistory {
        let params = ModelParams::default();
        let cf: Vec<Real> = (0..60).map(|d| 1e-4 * 1.05_f64.powi(d)).collect();
        CompartmentHistory::reconstruct(&cf, &params)
    }

    #[test]
    fn envelope_reduction() {
        let table = array![[0.5, 0.2], [0.1, 0.4], [0.7, 0.3]];
        let env = Envelope::from_members(&table);
        assert_eq!(env.center(), &vec![0.5, 0.2]);
        assert_eq!(env.min(), &vec![0.1, 0.2]);
        assert_eq!(env.max(), &vec![0.7, 0.4]);
        assert_approx_eq!(env.spread(0), 0.6);
        assert_eq!(env.spread(5), 0.0);
    }

    #[test]
    fn perturbations_span_one_std() {
        let params = ModelParams::default();
        let rates = perturbed_growth_rates(GrowthRate::new(0.05, 0.02), &params);
        assert_eq!(rates.len(), 10);
        assert_approx_eq!(rates[0], 0.03);
        assert_approx_eq!(rates[9], 0.07);

        assert_approx_eq!(rates[1], 0.03 + 0.04 / 9.0);

        let rates = perturbed_growth_rates(GrowthRate::new(0.01, 0.02), &params);
        assert_eq!(rates[0], 0.0);

        let mut single = ModelParams::default();
        single.set_n_perturbations(1);
        let rates = perturbed_growth_rates(GrowthRate::new(0.05, 0.02), &single);
        assert_eq!(rates.len(), 1);
        assert_approx_eq!(rates[0], 0.03);
        single.set_n_perturbations(0);
        assert!(perturbed_growth_rates(GrowthRate::new(0.05, 0.02), &single).is_empty());
    }

    #[test]
    fn envelope_contains_center() {
        let params = ModelParams::default();
        let ens = Ensemble::run(&growing_history(), GrowthRate::new(0.05, 0.02), &params, 30);
        assert_eq!(ens.n_members(), 11);
        for env in &[ens.susceptible(), ens.active(), ens.recovered()] {
            assert_eq!(env.len(), 31);
            for d in 0..env.len() {
                assert!(env.min()[d] <= env.center()[d]);
                assert!(env.center()[d] <= env.max()[d]);
            }
        }
    }

    #[test]
    fn uncertainty_compounds_forward() {
        let params = ModelParams::default();
        let ens = Ensemble::run(&growing_history(), GrowthRate::new(0.05, 0.02), &params, 30);
        let active = ens.active();
        assert_eq!(active.spread(0), 0.0);
        assert!(ens.transmission_rate() > 0.0);
        assert!(active.spread(30) >= active.spread(7));
        assert!(active.spread(7) > 0.0);
    }
}
