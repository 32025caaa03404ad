use pyo3::{prelude::*, wrap_pyfunction};

extern crate pyo3;
use chrono::NaiveDate;
use covid_projections::{estimate, params::ModelParams, prelude as rs, prelude::Real, series};
use paste::paste;
use pyo3::exceptions::*;
use pyo3::types::PyDict;
use pythonize::{depythonize, pythonize};

macro_rules! py_mutable_props {
    ($name:ident { $($x:ident : $t:ident),* }) => {
        paste! {
            #[pymethods]
            impl $name {
                $(
                    #[getter]
                    pub fn [<get_ $x>](&self) -> PyResult<$t> {
                        Ok(self.data.$x())
                    }

                    #[setter]
                    pub fn [<set_ $x>](&mut self, value: $t) -> PyResult<()> {
                        self.data.[<set_ $x>](value);
                        Ok(())
                    }
                )*
            }
        }
    };
}

macro_rules! py_immutable_props {
    ($name:ident { $($x:ident : $t:ident),*}) => {
        paste! {
            #[pymethods]
            impl $name {
                $(
                    #[getter]
                    pub fn [<get_ $x>](&self) -> PyResult<$t> {
                        Ok(self.data.$x())
                    }
                )*
            }
        }
    };
}

fn value_error(err: rs::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn params_from_dict(params: Option<&PyDict>) -> PyResult<ModelParams> {
    match params {
        Some(p) => Ok(depythonize(p.as_ref())?),
        None => Ok(ModelParams::default()),
    }
}

/// Model parameters. Keyword arguments override the defaults.
#[pyclass]
#[derive(Debug, Clone, Default)]
pub struct Params {
    data: ModelParams,
}

#[pymethods]
impl Params {
    #[new]
    #[args(kwds = "**")]
    fn new(kwds: Option<&PyDict>) -> PyResult<Self> {
        Ok(Params {
            data: params_from_dict(kwds)?,
        })
    }

    #[getter]
    fn get_projection_days(&self) -> Vec<usize> {
        self.data.projection_days().clone()
    }

    #[setter]
    fn set_projection_days(&mut self, value: Vec<usize>) {
        self.data.set_projection_days(value);
    }

    fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        Ok(pythonize(py, &self.data)?)
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("{:?}", self.data))
    }
}

py_mutable_props!(Params {
    growth_window: usize,
    death_lag: usize,
    recovery_lag: usize,
    recovery_lagged_rate: Real,
    recovery_rate_simple: Real,
    min_window_lag: usize,
    min_window_deaths: Real,
    n_perturbations: usize,
    perturbation_span: Real,
    backfill_threshold: Real,
    new_cases_lag: usize,
    icu_spare_capacity_ratio: Real
});

/// Collects regions sharing a date axis and computes their projections.
#[pyclass]
#[derive(Debug)]
pub struct Analysis {
    data: rs::Dataset,
    params: ModelParams,
    context: Option<rs::AnalysisContext>,
}

impl Analysis {
    fn context(&mut self) -> &rs::AnalysisContext {
        let (data, params) = (&self.data, &self.params);
        self.context
            .get_or_insert_with(|| rs::AnalysisContext::new(data, params.clone()))
    }
}

#[pymethods]
impl Analysis {
    /// Dates are ISO strings (YYYY-MM-DD), one per value of each series.
    #[new]
    #[args(params = "None")]
    fn new(dates: Vec<String>, params: Option<&PyDict>) -> PyResult<Self> {
        let mut parsed = Vec::with_capacity(dates.len());
        for date in &dates {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| PyValueError::new_err(format!("invalid date {:?}: {}", date, e)))?;
            parsed.push(date);
        }
        Ok(Analysis {
            data: rs::Dataset::new(parsed, vec![]).map_err(value_error)?,
            params: params_from_dict(params)?,
            context: None,
        })
    }

    #[args(icu_coefficient = "None", icu_capacity_per100k = "None")]
    fn add_region(
        &mut self,
        name: &str,
        cases: Vec<Real>,
        deaths: Vec<Real>,
        population: Real,
        ifr: Real,
        icu_coefficient: Option<Real>,
        icu_capacity_per100k: Option<Real>,
    ) -> PyResult<()> {
        let mut attrs = rs::RegionAttributes::new(population, ifr);
        if let Some(coef) = icu_coefficient {
            attrs = attrs.with_icu_coefficient(coef);
        }
        if let Some(capacity) = icu_capacity_per100k {
            attrs = attrs.with_icu_capacity(capacity);
        }
        let region = rs::Region::new(name, rs::RegionSeries::new(cases, deaths), attrs);

        let mut regions = self.data.regions().clone();
        regions.push(region);
        self.data = rs::Dataset::new(self.data.dates().clone(), regions).map_err(value_error)?;
        self.context = None;
        Ok(())
    }

    /// Copy of the analysis as it would have been `-days_offset` days ago.
    fn as_of(&self, days_offset: i64) -> PyResult<Analysis> {
        Ok(Analysis {
            data: self.data.truncated(days_offset).map_err(value_error)?,
            params: self.params.clone(),
            context: None,
        })
    }

    /// List of dicts with the output table columns.
    fn projections(&mut self, py: Python) -> PyResult<Vec<PyObject>> {
        let reports = self.context().projections();
        let mut out = Vec::with_capacity(reports.len());
        for report in &reports {
            let dict = PyDict::new(py);
            for (name, value) in report.columns() {
                dict.set_item(name, pythonize(py, &value)?)?;
            }
            out.push(dict.to_object(py));
        }
        Ok(out)
    }

    /// Full projected S/I/R envelopes for the given regions.
    fn traces(&mut self, py: Python, regions: Vec<String>) -> PyResult<PyObject> {
        let names: Vec<&str> = regions.iter().map(|s| s.as_str()).collect();
        let traces = self.context().traces(&names).map_err(value_error)?;
        Ok(pythonize(py, &traces)?)
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!(
            "Analysis({} regions, {} days)",
            self.data.regions().len(),
            self.data.n_days()
        ))
    }
}

py_immutable_props!(Analysis { n_days: usize });

/// Redistribute runs of zero daily cases into the next reported value.
#[pyfunction(threshold = "50.0")]
fn backfill(diffs: Vec<Real>, threshold: Real) -> Vec<Real> {
    series::backfill_missing(&diffs, threshold)
}

/// Daily testing bias of cumulative cases given cumulative deaths.
#[pyfunction(params = "None")]
fn testing_biases(cases: Vec<Real>, deaths: Vec<Real>, ifr: Real, params: Option<&PyDict>) -> PyResult<Vec<Real>> {
    if cases.len() != deaths.len() {
        return Err(PyValueError::new_err(format!(
            "cases and deaths must have the same length, got {} and {}",
            cases.len(),
            deaths.len()
        )));
    }
    let params = params_from_dict(params)?;
    Ok(estimate::testing_biases(&cases, &deaths, ifr, &params))
}

#[pymodule]
fn epiprojections(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Params>()?;
    m.add_class::<Analysis>()?;
    m.add_function(wrap_pyfunction!(backfill, m)?)?;
    m.add_function(wrap_pyfunction!(testing_biases, m)?)?;

    Ok(())
}
