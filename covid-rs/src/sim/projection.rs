use super::{AnalysisContext, RegionEstimate};
use crate::{
    error::{Error, Result},
    models::Envelope,
    params::ModelParams,
    prelude::{Day, Real},
    report::{Band, ProjectionResult, RegionReport},
    series::{last_increase, recent_increase},
    utils::safe_div,
};
use chrono::NaiveDate;
use getset::Getters;
use log::*;
use serde::Serialize;
use std::io;

const PER_100K: Real = 1e5;

/// Projection day reported by the unsuffixed columns.
const CURRENT_DAY: Day = 1;

impl RegionEstimate {
    /// ICU need per 100k inhabitants for each active fraction. Regions
    /// without an ICU coefficient report zero.
    fn icu_scale(&self) -> Real {
        match self.attributes().icu_coefficient() {
            Some(coef) => coef * PER_100K,
            None => 0.0,
        }
    }

    pub(crate) fn lacks_icu_coefficient(&self) -> bool {
        self.attributes().icu_coefficient().is_none()
    }

    /// Summarise the estimate as a row of the output table. `dates` is the
    /// date axis of the observed series.
    pub fn report(&self, dates: &[NaiveDate], params: &ModelParams) -> RegionReport {
        let attrs = self.attributes();
        let population = attrs.population();
        let lag = params.new_cases_lag();
        let per100k = |x: Real| safe_div(x, population, 0.0) * PER_100K;
        let date_of = |day: Option<Day>| day.and_then(|d| dates.get(d).cloned());

        let cases_total = self.cases().last().cloned().unwrap_or(0.0);
        let deaths_total = self.deaths().last().cloned().unwrap_or(0.0);
        let cases_new = recent_increase(self.cases(), lag);
        let deaths_new = recent_increase(self.deaths(), lag);
        let bias = self.current_bias();
        let cases_total_est = self.cases_est().last().cloned().unwrap_or(0.0);
        let cases_new_est = cases_new * bias;

        let ensemble = self.ensemble();
        let susceptible = ensemble.susceptible();
        let active = ensemble.active();
        let icu_scale = self.icu_scale();
        let current = self.history().last();

        let projections = params
            .projection_days()
            .iter()
            .map(|&horizon| ProjectionResult {
                horizon,
                icu_per100k: Band::scaled(&active, horizon, icu_scale),
                affected_ratio: Band::complement(&susceptible, horizon),
            })
            .collect();

        RegionReport {
            region: self.name().clone(),
            cases_total,
            cases_new,
            deaths_total,
            deaths_new,
            cases_total_per100k: per100k(cases_total),
            cases_new_per100k: per100k(cases_new),
            deaths_total_per100k: per100k(deaths_total),
            deaths_new_per100k: per100k(deaths_new),
            fatality_rate: safe_div(deaths_total, cases_total, 0.0),
            affected_ratio: safe_div(cases_total, population, 0.0),
            last_case_date: date_of(last_increase(self.cases())),
            last_death_date: date_of(last_increase(self.deaths())),
            cases_total_est,
            cases_new_est,
            cases_total_est_per100k: per100k(cases_total_est),
            cases_new_est_per100k: per100k(cases_new_est),
            current_testing_bias: bias,
            growth_rate: self.growth().rate,
            growth_rate_std: self.growth().std,
            current_active_ratio: current.active,
            current_recovered_ratio: current.recovered,
            transmission_rate: self.transmission().rate,
            transmission_rate_std: self.transmission().std,
            affected_ratio_est: Band::complement(&susceptible, CURRENT_DAY),
            need_icu_per100k: Band::scaled(&active, CURRENT_DAY, icu_scale),
            icu_capacity_per100k: attrs.icu_capacity_per100k(),
            icu_spare_capacity_per100k: attrs
                .icu_capacity_per100k()
                .map(|c| c * params.icu_spare_capacity_ratio()),
            projections,
        }
    }

    /// Full projected trajectories, for plotting and diagnostics.
    pub fn trace(&self) -> RegionTrace {
        let ensemble = self.ensemble();
        let initial = self.history().last();
        let title = format!(
            "{}: Transmission Rate: {:.1}%. S/I/R init: {:.1}%,{:.1}%,{:.1}%",
            self.name(),
            100.0 * self.transmission().rate,
            100.0 * initial.susceptible,
            100.0 * initial.active,
            100.0 * initial.recovered,
        );
        RegionTrace {
            region: self.name().clone(),
            title,
            transmission_rate: ensemble.transmission_rate(),
            susceptible: ensemble.susceptible(),
            active: ensemble.active(),
            recovered: ensemble.recovered(),
        }
    }
}

/// S/I/R envelopes of a region from the simulation start (day 0 = last
/// observed day).
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct RegionTrace {
    region: String,
    title: String,
    transmission_rate: Real,
    susceptible: Envelope,
    active: Envelope,
    recovered: Envelope,
}

impl RegionTrace {
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Write trace as a CSV table with a row per day.
    pub fn render_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["day".to_string()];
        for name in &["Susceptible", "Infected", "Removed"] {
            header.push(name.to_string());
            header.push(format!("{}.max", name));
            header.push(format!("{}.min", name));
        }
        wtr.write_record(&header)?;

        for day in 0..self.len() {
            let mut row = vec![day.to_string()];
            for env in &[&self.susceptible, &self.active, &self.recovered] {
                row.push(env.center()[day].to_string());
                row.push(env.max()[day].to_string());
                row.push(env.min()[day].to_string());
            }
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl AnalysisContext {
    /// Output table, one report per region in dataset order.
    pub fn projections(&self) -> Vec<RegionReport> {
        let reports: Vec<RegionReport> = self
            .estimates()
            .iter()
            .map(|e| e.report(self.dates(), self.params()))
            .collect();

        for est in self.estimates() {
            if est.lacks_icu_coefficient() && est.history().last().active > 0.0 {
                warn!(target: "projection", "{}: no ICU coefficient, ICU need reported as zero", est.name());
            }
        }
        return reports;
    }

    /// Traces for the given regions. Unknown names are an error.
    pub fn traces(&self, regions: &[&str]) -> Result<Vec<RegionTrace>> {
        regions
            .iter()
            .map(|name| {
                self.estimate(name)
                    .map(RegionEstimate::trace)
                    .ok_or_else(|| Error::MissingRegion(name.to_string()))
            })
            .collect()
    }
}
