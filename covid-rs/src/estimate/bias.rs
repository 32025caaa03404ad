use crate::{params::ModelParams, prelude::Real, series::daily_diffs, utils::safe_div};
use log::*;

/// Compute the testing bias for each day of a region's series.
///
/// The bias is the ratio between the lagged fatality rate observed in a
/// rolling window and the expected infection fatality ratio: it estimates how
/// many infections existed for each reported case. Windows must span at least
/// `min_window_lag` days and `min_window_deaths` new deaths. Regions that never
/// reach the deaths threshold use a single global ratio for the whole series.
///
/// Every value is clamped to a minimum of 1.
pub fn testing_biases(cases: &[Real], deaths: &[Real], ifr: Real, params: &ModelParams) -> Vec<Real> {
    let n = cases.len().min(deaths.len());
    if n == 0 {
        return vec![];
    }
    if !(ifr > 0.0) {
        warn!(target: "bias", "invalid IFR {}, assuming unbiased testing", ifr);
        return vec![1.0; cases.len()];
    }

    let global = global_bias(cases[n - 1], deaths[n - 1], ifr);
    let biases = if deaths[n - 1] < params.min_window_deaths() {
        vec![global; cases.len()]
    } else {
        match windowed_biases(&cases[..n], &deaths[..n], ifr, params) {
            Some(mut biases) => {
                biases.resize(cases.len(), *biases.last().unwrap_or(&global));
                biases
            }
            None => {
                debug!(target: "bias", "no valid window in {} days, using global ratio", n);
                vec![global; cases.len()]
            }
        }
    };
    biases.into_iter().map(|b| b.max(1.0)).collect()
}

/// Single fatality ratio for the whole series or 1.0 if there is no signal.
fn global_bias(cases: Real, deaths: Real, ifr: Real) -> Real {
    if deaths > 0.0 {
        safe_div(safe_div(deaths, cases, 0.0), ifr, 1.0)
    } else {
        1.0
    }
}

/// Two pointer sliding window over the date axis. Deaths at day `d` are
/// compared with cases at day `d - death_lag`.
///
/// Return None if no window satisfies the constraints.
fn windowed_biases(cases: &[Real], deaths: &[Real], ifr: Real, params: &ModelParams) -> Option<Vec<Real>> {
    let n = cases.len();
    let lag = params.death_lag();
    let min_lag = params.min_window_lag();
    let min_deaths = params.min_window_deaths();

    let diff_deaths = |right: usize, left: usize| deaths[right] - deaths[left];
    let diff_cases = |right: usize, left: usize| cases[right - lag] - cases[left - lag];
    let valid = |right: usize, left: usize| {
        right >= left + min_lag && diff_deaths(right, left) >= min_deaths
    };

    let mut computed: Vec<Option<Real>> = vec![None; n];
    let (mut left, mut right) = (lag, lag + min_lag);

    while right < n {
        if !valid(right, left) {
            right += 1;
            continue;
        }
        while valid(right, left + 1) {
            left += 1;
        }
        let window_cases = diff_cases(right, left);
        if window_cases > 0.0 {
            computed[right] = Some(diff_deaths(right, left) / window_cases / ifr);
        }
        // always advance left to guarantee termination
        left += 1;
    }

    // days before the first window take its value, gaps take the previous one
    let mut last = computed.iter().find_map(|x| *x)?;
    Some(
        computed
            .into_iter()
            .map(|value| {
                if let Some(x) = value {
                    last = x;
                }
                last
            })
            .collect(),
    )
}

/// Estimated cumulative cases: each day's new reported cases are scaled by the
/// testing bias of that day.
pub fn estimated_cases(cases: &[Real], biases: &[Real]) -> Vec<Real> {
    let mut total = 0.0;
    daily_diffs(cases)
        .into_iter()
        .zip(biases.iter())
        .map(|(diff, bias)| {
            total += diff * bias;
            total
        })
        .collect()
}
