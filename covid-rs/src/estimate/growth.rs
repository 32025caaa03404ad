use crate::{
    prelude::Real,
    utils::{safe_div, WeightedStats, WeightedStatsVec},
};
use serde::{Deserialize, Serialize};

/// Daily growth rate of estimated cases and its standard deviation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRate {
    pub rate: Real,
    pub std: Real,
}

/// Daily person-to-person transmission rate and its standard deviation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRate {
    pub rate: Real,
    pub std: Real,
}

impl GrowthRate {
    pub fn new(rate: Real, std: Real) -> Self {
        GrowthRate { rate, std }
    }

    /// Growth rate shifted by `ratio` standard deviations and clipped at
    /// zero.
    pub fn perturbed(&self, ratio: Real) -> Real {
        (self.rate + ratio * self.std).max(0.0)
    }
}

/// Weighted mean daily growth rate over the last `n_days` of a cumulative
/// series.
///
/// Each day contributes the ratio `cases / (cases - new_cases)`, with a +1
/// pseudo count so regions with very few cases never divide by zero. Days
/// with more cases have lower sampling noise and receive proportionally more
/// weight. Negative new cases (data corrections) are clipped to zero.
pub fn smoothed_growth_rate(cases: &[Real], n_days: usize) -> GrowthRate {
    let n = cases.len();
    let mut stats = WeightedStatsVec::new();

    for d in n.saturating_sub(n_days)..n {
        let total = cases[d] + 1.0;
        let new = if d > 0 { (cases[d] - cases[d - 1]).max(0.0) } else { 0.0 };
        let prev = total - new;
        let ratio = if prev > 0.0 { safe_div(total, prev, 1.0) } else { 1.0 };
        stats.add(ratio, total);
    }

    if stats.size() == 0 {
        return GrowthRate::default();
    }
    GrowthRate::new(stats.mean() - 1.0, stats.std())
}

/// Convert a growth rate into a transmission rate given the current active
/// and recovered fractions.
///
/// Solves the balance `growth = rate * active * (1 - total) / total` with
/// `total = active + recovered`. Degenerate states (no active cases or the
/// whole population affected) yield zero.
pub fn growth_to_transmission_rate(growth: Real, active: Real, recovered: Real) -> Real {
    let total = active + recovered;
    if !(active > 0.0) || total >= 1.0 {
        return 0.0;
    }
    safe_div(growth * total, (1.0 - total) * active, 0.0)
}

/// Transmission rate at the center growth rate with a standard deviation
/// taken as half the distance between the rates at `growth ± std` (the
/// lower bound clipped at zero growth).
pub fn transmission_rate_with_std(growth: GrowthRate, active: Real, recovered: Real) -> TransmissionRate {
    let rate = growth_to_transmission_rate(growth.rate, active, recovered);
    let upper = growth_to_transmission_rate(growth.rate + growth.std, active, recovered);
    let lower = growth_to_transmission_rate(growth.perturbed(-1.0), active, recovered);
    TransmissionRate {
        rate,
        std: (upper - lower) / 2.0,
    }
}
