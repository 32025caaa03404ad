use super::{Dataset, Region, RegionAttributes, RegionSeries};
use crate::{
    error::{Error, Result},
    estimate::{age_adjusted_ifr, icu_need_coefficient},
    params::{AgeDistribution5, AGE_BUCKETS, REFERENCE_REGION},
    prelude::Real,
};
use chrono::NaiveDate;
use log::*;
use serde::Deserialize;
use std::{collections::BTreeMap, io, path::Path};

/// A row of the long-format series table. Rows sharing region and date are
/// summed, so provinces aggregate into their country.
#[derive(Debug, Deserialize)]
struct SeriesRow {
    region: String,
    date: String,
    cases: Real,
    deaths: Real,
}

/// A row of the region attributes table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributesRow {
    pub region: String,
    pub population: Option<Real>,
    pub ifr: Option<Real>,
    pub icu_coefficient: Option<Real>,
    pub icu_capacity_per100k: Option<Real>,
}

/// Cumulative (cases, deaths) by region and date.
pub type SeriesTable = BTreeMap<String, BTreeMap<NaiveDate, (Real, Real)>>;

/// Age pyramid by region: counts in thousands for each 5-year bucket.
pub type AgePyramids = BTreeMap<String, AgeDistribution5>;

pub fn read_series<R: io::Read>(rdr: R) -> Result<SeriesTable> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut table = SeriesTable::new();
    for res in reader.deserialize() {
        let row: SeriesRow = res?;
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")?;
        let ent = table
            .entry(row.region)
            .or_insert_with(BTreeMap::new)
            .entry(date)
            .or_insert((0.0, 0.0));
        ent.0 += row.cases;
        ent.1 += row.deaths;
    }
    Ok(table)
}

pub fn read_attributes<R: io::Read>(rdr: R) -> Result<Vec<AttributesRow>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = vec![];
    for res in reader.deserialize() {
        rows.push(res?);
    }
    Ok(rows)
}

/// Read a table with a region column followed by one column per 5-year age
/// bucket (0-4 up to 100+).
pub fn read_age_pyramids<R: io::Read>(rdr: R) -> Result<AgePyramids> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut out = AgePyramids::new();
    for res in reader.records() {
        let record = res?;
        let region = record.get(0).unwrap_or_default().trim().to_string();
        if record.len() != AGE_BUCKETS + 1 {
            return Err(Error::InvalidParameter(format!(
                "age pyramid for {} has {} buckets, expected {}",
                region,
                record.len().saturating_sub(1),
                AGE_BUCKETS
            )));
        }
        let mut counts = [0.0; AGE_BUCKETS];
        for (i, field) in record.iter().skip(1).enumerate() {
            counts[i] = field.trim().replace(' ', "").parse().map_err(|_| {
                Error::InvalidParameter(format!("invalid count {:?} for {}", field, region))
            })?;
        }
        out.insert(region, counts);
    }
    Ok(out)
}

/// Join series and attributes into a dataset.
///
/// The date axis spans every date present in the series table. Missing days
/// repeat the previous cumulative value. Regions without population or IFR
/// (even after filling from age pyramids) are skipped.
pub fn build_dataset(series: SeriesTable, attributes: &[AttributesRow], ages: &AgePyramids) -> Result<Dataset> {
    let first = series.values().filter_map(|s| s.keys().next()).min().cloned();
    let last = series.values().filter_map(|s| s.keys().next_back()).max().cloned();
    let dates = match (first, last) {
        (Some(a), Some(b)) => Dataset::daily_dates(a, (b - a).num_days() as usize + 1),
        _ => return Err(Error::MissingData),
    };

    let reference_ifr = ages.get(REFERENCE_REGION).map(age_adjusted_ifr);
    let mut regions = vec![];

    for row in attributes {
        let data = match series.get(&row.region) {
            Some(data) => data,
            None => {
                warn!(target: "loader", "no series for region {}", row.region);
                continue;
            }
        };
        let attrs = match fill_attributes(row, ages.get(&row.region), reference_ifr) {
            Some(attrs) => attrs,
            None => {
                warn!(target: "loader", "missing population or IFR for {}", row.region);
                continue;
            }
        };

        let (mut cases, mut deaths) = (Vec::with_capacity(dates.len()), Vec::with_capacity(dates.len()));
        let mut prev = (0.0, 0.0);
        for date in &dates {
            prev = data.get(date).cloned().unwrap_or(prev);
            cases.push(prev.0);
            deaths.push(prev.1);
        }
        regions.push(Region::new(&row.region, RegionSeries::new(cases, deaths), attrs));
    }

    for name in series.keys() {
        if !attributes.iter().any(|row| &row.region == name) {
            warn!(target: "loader", "no attributes for region {}, skipping", name);
        }
    }
    info!(target: "loader", "loaded {} regions over {} days", regions.len(), dates.len());
    Dataset::new(dates, regions)
}

/// Explicit attributes take precedence over values derived from the age
/// pyramid.
fn fill_attributes(
    row: &AttributesRow,
    pyramid: Option<&AgeDistribution5>,
    reference_ifr: Option<Real>,
) -> Option<RegionAttributes> {
    let derived_ifr = pyramid.map(age_adjusted_ifr);
    let population = row
        .population
        .or_else(|| pyramid.map(|p| p.iter().sum::<Real>() * 1000.0))?;
    let ifr = row.ifr.or(derived_ifr)?;

    let mut attrs = RegionAttributes::new(population, ifr);
    let icu = row.icu_coefficient.or_else(|| match (derived_ifr, reference_ifr) {
        (Some(ifr), Some(reference)) => Some(icu_need_coefficient(ifr, reference)),
        _ => None,
    });
    if let Some(value) = icu {
        attrs = attrs.with_icu_coefficient(value);
    }
    if let Some(value) = row.icu_capacity_per100k {
        attrs = attrs.with_icu_capacity(value);
    }
    Some(attrs)
}

/// Load dataset from CSV files. See build_dataset() for the joining rules.
pub fn load_dataset(
    series_path: impl AsRef<Path>,
    attributes_path: impl AsRef<Path>,
    ages_path: Option<&Path>,
) -> Result<Dataset> {
    let series = read_series(std::fs::File::open(series_path)?)?;
    let attributes = read_attributes(std::fs::File::open(attributes_path)?)?;
    let ages = match ages_path {
        Some(path) => read_age_pyramids(std::fs::File::open(path)?)?,
        None => AgePyramids::new(),
    };
    build_dataset(series, &attributes, &ages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const SERIES: &str = "\
region,date,cases,deaths
Atlantis,2020-03-01,10,0
Atlantis,2020-03-03,30,1
Lemuria,2020-03-02,5,0
Lemuria,2020-03-02,7,1
Mu,2020-03-01,1,0
";

    const ATTRIBUTES: &str = "\
region,population,ifr,icu_coefficient,icu_capacity_per100k
Atlantis,1000000,0.01,0.002,12.5
Lemuria,500000,0.008,,
Eldorado,100,0.01,,
";

    #[test]
    fn series_rows_are_summed() {
        let table = read_series(SERIES.as_bytes()).unwrap();
        let date = NaiveDate::from_ymd(2020, 3, 2);
        assert_eq!(table["Lemuria"][&date], (12.0, 1.0));
    }

    #[test]
    fn dataset_fills_missing_days() {
        let table = read_series(SERIES.as_bytes()).unwrap();
        let attrs = read_attributes(ATTRIBUTES.as_bytes()).unwrap();
        let data = build_dataset(table, &attrs, &AgePyramids::new()).unwrap();

        assert_eq!(data.n_days(), 3);
        assert_eq!(data.regions().len(), 2);
        let atlantis = data.region("Atlantis").unwrap();
        assert_eq!(atlantis.series().cases(), &vec![10.0, 10.0, 30.0]);
        assert_eq!(atlantis.attributes().icu_coefficient(), Some(0.002));
        assert_eq!(atlantis.attributes().icu_capacity_per100k(), Some(12.5));

        let lemuria = data.region("Lemuria").unwrap();
        assert_eq!(lemuria.series().cases(), &vec![0.0, 12.0, 12.0]);
        assert_eq!(lemuria.attributes().icu_coefficient(), None);
        assert!(data.region("Eldorado").is_none());
    }

    #[test]
    fn attributes_from_age_pyramid() {
        let mut header = String::from("region");
        for i in 0..AGE_BUCKETS {
            header.push_str(&format!(",b{}", i));
        }
        let ones = vec!["1"; AGE_BUCKETS].join(",");
        let data = format!("{}\nUnited Kingdom,{}\nLemuria,{}\n", header, ones, ones);
        let ages = read_age_pyramids(data.as_bytes()).unwrap();

        let row = AttributesRow {
            region: "Lemuria".into(),
            ..Default::default()
        };
        let reference = ages.get(REFERENCE_REGION).map(age_adjusted_ifr);
        let attrs = fill_attributes(&row, ages.get("Lemuria"), reference).unwrap();
        assert_approx_eq!(attrs.population(), 21_000.0);
        assert_approx_eq!(attrs.icu_coefficient().unwrap(), 0.044 / 14.0);
        assert!(fill_attributes(&row, None, reference).is_none());
    }

    #[test]
    fn malformed_age_pyramid() {
        let data = "region,a,b\nMu,1,2\n";
        assert!(read_age_pyramids(data.as_bytes()).is_err());
    }
}
