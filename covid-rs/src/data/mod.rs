//! Input data: cumulative series and static attributes per region.
mod loader;

pub use loader::*;

use crate::{
    error::{Error, Result},
    prelude::Real,
};
use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

/// Cumulative reported cases and deaths, one value per date of the dataset.
/// Values are expected to be non-decreasing, but data corrections may break
/// that.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct RegionSeries {
    cases: Vec<Real>,
    deaths: Vec<Real>,
}

impl RegionSeries {
    pub fn new(cases: Vec<Real>, deaths: Vec<Real>) -> Self {
        RegionSeries { cases, deaths }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Keep only the first n days.
    fn truncate(&mut self, n: usize) {
        self.cases.truncate(n);
        self.deaths.truncate(n);
    }
}

/// Static reference data for a region.
#[derive(Debug, Clone, Copy, PartialEq, Default, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct RegionAttributes {
    population: Real,
    /// Age adjusted infection fatality ratio.
    ifr: Real,
    /// Fraction of active infections requiring ICU care.
    icu_coefficient: Option<Real>,
    icu_capacity_per100k: Option<Real>,
}

impl RegionAttributes {
    pub fn new(population: Real, ifr: Real) -> Self {
        RegionAttributes {
            population,
            ifr,
            icu_coefficient: None,
            icu_capacity_per100k: None,
        }
    }

    pub fn with_icu_coefficient(mut self, value: Real) -> Self {
        self.icu_coefficient = Some(value);
        self
    }

    pub fn with_icu_capacity(mut self, per100k: Real) -> Self {
        self.icu_capacity_per100k = Some(per100k);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct Region {
    name: String,
    series: RegionSeries,
    attributes: RegionAttributes,
}

impl Region {
    pub fn new(name: &str, series: RegionSeries, attributes: RegionAttributes) -> Self {
        Region {
            name: name.to_string(),
            series,
            attributes,
        }
    }
}

/// All regions of an analysis run, sharing the same date axis.
#[derive(Debug, Clone, PartialEq, Default, Getters)]
#[getset(get = "pub")]
pub struct Dataset {
    dates: Vec<NaiveDate>,
    regions: Vec<Region>,
}

impl Dataset {
    /// Create dataset checking that every series covers all dates.
    pub fn new(dates: Vec<NaiveDate>, regions: Vec<Region>) -> Result<Self> {
        for region in &regions {
            let series = region.series();
            for got in [series.cases().len(), series.deaths().len()].iter() {
                if *got != dates.len() {
                    return Err(Error::Shape {
                        region: region.name.clone(),
                        expected: dates.len(),
                        got: *got,
                    });
                }
            }
        }
        Ok(Dataset { dates, regions })
    }

    /// Consecutive dates starting at `start`.
    pub fn daily_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        std::iter::successors(Some(start), |d| d.succ_opt())
            .take(n)
            .collect()
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn n_days(&self) -> usize {
        self.dates.len()
    }

    /// Last date of the dataset.
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.dates.last().cloned()
    }

    /// The dataset as it would have been `-days_offset` days ago.
    pub fn truncated(&self, days_offset: i64) -> Result<Self> {
        if days_offset > 0 {
            return Err(Error::InvalidParameter(format!(
                "days_offset can only be 0 or negative, got {}",
                days_offset
            )));
        }
        let n = self.n_days().saturating_sub((-days_offset) as usize);
        if n == 0 {
            return Err(Error::MissingData);
        }
        let mut new = self.clone();
        new.dates.truncate(n);
        for region in new.regions.iter_mut() {
            region.series.truncate(n);
        }
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn small_dataset() -> Dataset {
        let dates = Dataset::daily_dates(date("2020-03-01"), 4);
        let region = Region::new(
            "Atlantis",
            RegionSeries::new(vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 0.0, 1.0, 1.0]),
            RegionAttributes::new(1e6, 0.01),
        );
        Dataset::new(dates, vec![region]).unwrap()
    }

    #[test]
    fn rejects_mismatched_series() {
        let dates = Dataset::daily_dates(date("2020-03-01"), 3);
        let region = Region::new(
            "Atlantis",
            RegionSeries::new(vec![1.0, 2.0], vec![0.0, 0.0]),
            RegionAttributes::new(1e6, 0.01),
        );
        match Dataset::new(dates, vec![region]) {
            Err(Error::Shape { expected, got, .. }) => assert_eq!((expected, got), (3, 2)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncate_to_past_date() {
        let data = small_dataset();
        let past = data.truncated(-2).unwrap();
        assert_eq!(past.n_days(), 2);
        assert_eq!(past.current_date(), Some(date("2020-03-02")));
        assert_eq!(past.region("Atlantis").unwrap().series().cases(), &vec![1.0, 2.0]);
        assert!(data.truncated(1).is_err());
        assert!(data.truncated(-4).is_err());
    }
}
