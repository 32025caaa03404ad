use crate::{
    data::{Dataset, Region, RegionAttributes},
    estimate::{
        estimated_cases, smoothed_growth_rate, testing_biases, transmission_rate_with_std, GrowthRate,
        TransmissionRate,
    },
    models::{case_fractions, CompartmentHistory, Ensemble},
    params::ModelParams,
    prelude::{Day, Real},
    series::backfill_cumulative,
};
use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use log::*;
use rayon::prelude::*;

/// Intermediate series and fitted rates of a single region. Computed once and
/// read-only afterwards.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct RegionEstimate {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    attributes: RegionAttributes,
    /// Reported cumulative cases after redistributing reporting gaps.
    #[getset(get = "pub")]
    cases: Vec<Real>,
    #[getset(get = "pub")]
    deaths: Vec<Real>,
    #[getset(get = "pub")]
    biases: Vec<Real>,
    #[getset(get = "pub")]
    cases_est: Vec<Real>,
    #[getset(get = "pub")]
    case_fractions: Vec<Real>,
    #[getset(get = "pub")]
    history: CompartmentHistory,
    #[getset(get_copy = "pub")]
    growth: GrowthRate,
    #[getset(get_copy = "pub")]
    transmission: TransmissionRate,
    #[getset(get = "pub")]
    ensemble: Ensemble,
}

impl RegionEstimate {
    /// Run the estimation pipeline for a region and project it `n_days`
    /// forward.
    pub fn compute(region: &Region, params: &ModelParams, n_days: Day) -> Self {
        let attributes = *region.attributes();
        let series = region.series();

        let cases = backfill_cumulative(series.cases(), params.backfill_threshold());
        let deaths = series.deaths().clone();
        let biases = testing_biases(&cases, &deaths, attributes.ifr(), params);
        let cases_est = estimated_cases(&cases, &biases);
        let case_fractions = case_fractions(&cases_est, attributes.population());
        let history = CompartmentHistory::reconstruct(&case_fractions, params);

        let growth = smoothed_growth_rate(&cases_est, params.growth_window());
        let last = history.last();
        let transmission = transmission_rate_with_std(growth, last.active, last.recovered);
        if growth.rate > 0.0 && transmission.rate == 0.0 {
            debug!(target: "context", "{}: degenerate state, transmission rate set to zero", region.name());
        }
        let ensemble = Ensemble::run(&history, growth, params, n_days);

        RegionEstimate {
            name: region.name().clone(),
            attributes,
            cases,
            deaths,
            biases,
            cases_est,
            case_fractions,
            history,
            growth,
            transmission,
            ensemble,
        }
    }

    /// Testing bias at the last observed day.
    pub fn current_bias(&self) -> Real {
        self.biases.last().cloned().unwrap_or(1.0)
    }
}

/// Estimates for every region of a dataset under a fixed set of parameters.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct AnalysisContext {
    #[getset(get = "pub")]
    params: ModelParams,
    #[getset(get = "pub")]
    dates: Vec<NaiveDate>,
    #[getset(get = "pub")]
    estimates: Vec<RegionEstimate>,
    #[getset(get_copy = "pub")]
    parallel: bool,
}

impl AnalysisContext {
    /// Compute estimates for all regions, in parallel.
    pub fn new(dataset: &Dataset, params: ModelParams) -> Self {
        Self::build(dataset, params, true)
    }

    /// Same as new(), but process regions one at a time.
    pub fn sequential(dataset: &Dataset, params: ModelParams) -> Self {
        Self::build(dataset, params, false)
    }

    fn build(dataset: &Dataset, params: ModelParams, parallel: bool) -> Self {
        let n_days = params.simulation_days();
        info!(
            target: "context",
            "analysing {} regions over {} days, horizons {:?}",
            dataset.regions().len(),
            dataset.n_days(),
            params.projection_days()
        );

        let estimates = if parallel {
            dataset
                .regions()
                .par_iter()
                .map(|r| RegionEstimate::compute(r, &params, n_days))
                .collect()
        } else {
            dataset
                .regions()
                .iter()
                .map(|r| RegionEstimate::compute(r, &params, n_days))
                .collect()
        };

        AnalysisContext {
            params,
            dates: dataset.dates().clone(),
            estimates,
            parallel,
        }
    }

    pub fn estimate(&self, name: &str) -> Option<&RegionEstimate> {
        self.estimates.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RegionSeries;
    use assert_approx_eq::assert_approx_eq;

    fn dataset() -> Dataset {
        let n = 40;
        let start = NaiveDate::from_ymd(2020, 3, 1);
        let growing: Vec<Real> = (0..n).map(|d| 100.0 * 1.08_f64.powi(d)).collect();
        let deaths: Vec<Real> = growing.iter().map(|c| c * 0.02).collect();
        let regions = vec![
            Region::new(
                "Atlantis",
                RegionSeries::new(growing, deaths),
                RegionAttributes::new(1e6, 0.01).with_icu_coefficient(0.003),
            ),
            Region::new(
                "Lemuria",
                RegionSeries::new(vec![0.0; n as usize], vec![0.0; n as usize]),
                RegionAttributes::new(1e6, 0.01),
            ),
        ];
        Dataset::new(Dataset::daily_dates(start, n as usize), regions).unwrap()
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let data = dataset();
        let a = AnalysisContext::new(&data, ModelParams::default());
        let b = AnalysisContext::sequential(&data, ModelParams::default());
        for (x, y) in a.estimates().iter().zip(b.estimates()) {
            assert_eq!(x.name(), y.name());
            assert_eq!(x.cases_est(), y.cases_est());
            assert_eq!(x.transmission(), y.transmission());
        }
    }

    #[test]
    fn estimates_cover_all_days() {
        let ctx = AnalysisContext::new(&dataset(), ModelParams::default());
        let est = ctx.estimate("Atlantis").unwrap();
        assert_eq!(est.biases().len(), 40);
        assert_eq!(est.history().len(), 40);
        assert_approx_eq!(est.current_bias(), 2.0, 1e-6);
        assert!(est.growth().rate > 0.05);
        assert!(est.transmission().rate > 0.0);
        assert_eq!(est.ensemble().n_days(), 30);
    }

    #[test]
    fn empty_region_stays_empty() {
        let ctx = AnalysisContext::new(&dataset(), ModelParams::default());
        let est = ctx.estimate("Lemuria").unwrap();
        assert!(est.case_fractions().iter().all(|&x| x == 0.0));
        assert_eq!(est.transmission().rate, 0.0);
        assert!(est.ensemble().active().max().iter().all(|&x| x == 0.0));
    }
}
