//! Output table with current and projected indicators per region.
use crate::{
    error::Result,
    models::Envelope,
    prelude::{Day, Horizon, Real},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, io};

/// Center value of a projection and its envelope. `err` is half the range.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub center: Real,
    pub min: Real,
    pub max: Real,
    pub err: Real,
}

impl Band {
    pub fn new(center: Real, min: Real, max: Real) -> Self {
        Band {
            center,
            min,
            max,
            err: (max - min) / 2.0,
        }
    }

    /// Band of `scale * x` at the given day of the envelope. Days past the
    /// end of the envelope give an empty band.
    pub fn scaled(envelope: &Envelope, day: Day, scale: Real) -> Self {
        let at = |xs: &Vec<Real>| xs.get(day).cloned().unwrap_or(0.0) * scale;
        Band::new(at(envelope.center()), at(envelope.min()), at(envelope.max()))
    }

    /// Band of `1 - S` from the susceptible envelope. Extremes swap: the
    /// largest affected ratio comes from the smallest susceptible fraction.
    pub fn complement(susceptible: &Envelope, day: Day) -> Self {
        let at = |xs: &Vec<Real>| 1.0 - xs.get(day).cloned().unwrap_or(1.0);
        Band::new(at(susceptible.center()), at(susceptible.max()), at(susceptible.min()))
    }
}

/// Projected indicators at a single horizon.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub horizon: Horizon,
    pub icu_per100k: Band,
    pub affected_ratio: Band,
}

/// A row of the output table.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: String,

    // Reported
    pub cases_total: Real,
    pub cases_new: Real,
    pub deaths_total: Real,
    pub deaths_new: Real,
    pub cases_total_per100k: Real,
    pub cases_new_per100k: Real,
    pub deaths_total_per100k: Real,
    pub deaths_new_per100k: Real,
    pub fatality_rate: Real,
    pub affected_ratio: Real,
    pub last_case_date: Option<NaiveDate>,
    pub last_death_date: Option<NaiveDate>,

    // Bias corrected
    pub cases_total_est: Real,
    pub cases_new_est: Real,
    pub cases_total_est_per100k: Real,
    pub cases_new_est_per100k: Real,
    pub current_testing_bias: Real,
    pub growth_rate: Real,
    pub growth_rate_std: Real,
    pub current_active_ratio: Real,
    pub current_recovered_ratio: Real,
    pub transmission_rate: Real,
    pub transmission_rate_std: Real,
    /// Affected ratio and ICU need projected one day ahead.
    pub affected_ratio_est: Band,
    #[serde(rename = "needICU_per100k")]
    pub need_icu_per100k: Band,
    pub icu_capacity_per100k: Option<Real>,
    pub icu_spare_capacity_per100k: Option<Real>,

    pub projections: Vec<ProjectionResult>,
}

/// A single value of the flattened output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Real),
    Text(String),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<Real> for Cell {
    fn from(x: Real) -> Self {
        Cell::Number(x)
    }
}

impl From<Option<Real>> for Cell {
    fn from(x: Option<Real>) -> Self {
        x.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(x: Option<NaiveDate>) -> Self {
        x.map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Cell::Empty)
    }
}

impl RegionReport {
    /// Flatten report into named columns. Bands are expanded as
    /// `affected_ratio_est`, `affected_ratio_est.min`, ..., followed by the
    /// projections `affected_ratio_est.+7d`, `affected_ratio_est.+7d.min`, etc.
    pub fn columns(&self) -> Vec<(String, Cell)> {
        let mut out: Vec<(String, Cell)> = vec![("region".into(), Cell::Text(self.region.clone()))];
        let mut push = |name: &str, value: Cell| out.push((name.to_string(), value));

        push("cases_total", self.cases_total.into());
        push("cases_new", self.cases_new.into());
        push("deaths_total", self.deaths_total.into());
        push("deaths_new", self.deaths_new.into());
        push("cases_total_per100k", self.cases_total_per100k.into());
        push("cases_new_per100k", self.cases_new_per100k.into());
        push("deaths_total_per100k", self.deaths_total_per100k.into());
        push("deaths_new_per100k", self.deaths_new_per100k.into());
        push("fatality_rate", self.fatality_rate.into());
        push("affected_ratio", self.affected_ratio.into());
        push("last_case_date", self.last_case_date.into());
        push("last_death_date", self.last_death_date.into());
        push("cases_total_est", self.cases_total_est.into());
        push("cases_new_est", self.cases_new_est.into());
        push("cases_total_est_per100k", self.cases_total_est_per100k.into());
        push("cases_new_est_per100k", self.cases_new_est_per100k.into());
        push("current_testing_bias", self.current_testing_bias.into());
        push("growth_rate", self.growth_rate.into());
        push("growth_rate_std", self.growth_rate_std.into());
        push("current_active_ratio", self.current_active_ratio.into());
        push("current_recovered_ratio", self.current_recovered_ratio.into());
        push("transmission_rate", self.transmission_rate.into());
        push("transmission_rate_std", self.transmission_rate_std.into());
        push("icu_capacity_per100k", self.icu_capacity_per100k.into());
        push("icu_spare_capacity_per100k", self.icu_spare_capacity_per100k.into());

        push_band(&mut push, "affected_ratio_est", &self.affected_ratio_est);
        for p in &self.projections {
            push_band(&mut push, &format!("affected_ratio_est.+{}d", p.horizon), &p.affected_ratio);
        }
        push_band(&mut push, "needICU_per100k", &self.need_icu_per100k);
        for p in &self.projections {
            push_band(&mut push, &format!("needICU_per100k.+{}d", p.horizon), &p.icu_per100k);
        }
        return out;
    }
}

fn push_band(push: &mut impl FnMut(&str, Cell), name: &str, band: &Band) {
    push(name, band.center.into());
    push(&format!("{}.min", name), band.min.into());
    push(&format!("{}.max", name), band.max.into());
    push(&format!("{}.err", name), band.err.into());
}

/// Write reports as a CSV table. The header is taken from the first report,
/// so all reports must share the same projection horizons.
pub fn write_csv<W: io::Write>(reports: &[RegionReport], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if let Some(first) = reports.first() {
        wtr.write_record(first.columns().iter().map(|(name, _)| name.as_str()))?;
    }
    for report in reports {
        wtr.write_record(report.columns().iter().map(|(_, value)| value.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    fn report() -> RegionReport {
        RegionReport {
            region: "Atlantis".into(),
            cases_total: 100.0,
            affected_ratio_est: Band::new(0.1, 0.1, 0.12),
            need_icu_per100k: Band::new(2.0, 1.5, 2.5),
            icu_capacity_per100k: Some(10.0),
            projections: vec![ProjectionResult {
                horizon: 7,
                icu_per100k: Band::new(3.0, 2.0, 5.0),
                affected_ratio: Band::new(0.2, 0.15, 0.3),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn complement_swaps_extremes() {
        let members = array![[0.8, 0.7], [0.9, 0.75], [0.7, 0.6]];
        let env = Envelope::from_members(&members);
        let band = Band::complement(&env, 1);
        assert_approx_eq!(band.center, 0.3);
        assert_approx_eq!(band.max, 0.4);
        assert_approx_eq!(band.min, 0.25);
        assert_approx_eq!(band.err, 0.075);
        assert!(band.min <= band.center && band.center <= band.max);
    }

    #[test]
    fn scaled_band() {
        let members = array![[0.01, 0.02], [0.02, 0.03]];
        let env = Envelope::from_members(&members);
        let band = Band::scaled(&env, 1, 1e5);
        assert_approx_eq!(band.center, 2000.0);
        assert_approx_eq!(band.max, 3000.0);
        assert_eq!(Band::scaled(&env, 5, 1e5), Band::default());
    }

    #[test]
    fn column_names() {
        let names: Vec<String> = report().columns().into_iter().map(|(k, _)| k).collect();
        for expected in &[
            "cases_total",
            "current_testing_bias",
            "cases_total_est_per100k",
            "cases_new_est_per100k",
            "affected_ratio_est",
            "affected_ratio_est.min",
            "affected_ratio_est.max",
            "affected_ratio_est.err",
            "affected_ratio_est.+7d",
            "affected_ratio_est.+7d.min",
            "affected_ratio_est.+7d.max",
            "affected_ratio_est.+7d.err",
            "needICU_per100k",
            "needICU_per100k.err",
            "needICU_per100k.+7d.err",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }

        let columns = report().columns();
        let value = |name: &str| columns.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone());
        assert_eq!(value("needICU_per100k"), Some(Cell::Number(2.0)));
        assert_eq!(value("needICU_per100k.err"), Some(Cell::Number(0.5)));
        assert_eq!(value("affected_ratio_est.max"), Some(Cell::Number(0.12)));
    }

    #[test]
    fn csv_output() {
        let mut buf = vec![];
        write_csv(&[report(), report()], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("region,cases_total,"));
        assert!(lines[1].starts_with("Atlantis,100,"));
        assert!(lines[1].contains(",10,"));
    }
}
