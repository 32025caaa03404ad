use std::{fs, path::PathBuf};

use covid_projections::{
    data::load_dataset,
    params::ModelParams,
    prelude::*,
    report::write_csv,
    utils::{render_band, render_vbars},
};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Long format table with region,date,cases,deaths columns.
    series: PathBuf,
    attributes: PathBuf,
    age_pyramids: Option<PathBuf>,
    /// Run the analysis as if it was `-days_offset` days ago.
    days_offset: i64,
    output: PathBuf,
    /// Regions whose full trajectories are written to `<trace_dir>/<region>.csv`.
    debug_regions: Vec<String>,
    trace_dir: PathBuf,
    verbose: bool,
    params: ModelParams,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            series: "series.csv".into(),
            attributes: "attributes.csv".into(),
            age_pyramids: None,
            days_offset: 0,
            output: "projections.csv".into(),
            debug_regions: vec![],
            trace_dir: ".".into(),
            verbose: false,
            params: ModelParams::default(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }
}

pub fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "conf.toml".to_string());
    let cfg = Config::load(&path)?;

    let level = if cfg.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("could not start logger: {}", err);
    }
    if cfg.verbose {
        println!("{:#?}", cfg);
    }

    let dataset = load_dataset(&cfg.series, &cfg.attributes, cfg.age_pyramids.as_deref())?;
    let dataset = dataset.truncated(cfg.days_offset)?;
    let ctx = AnalysisContext::new(&dataset, cfg.params.clone());

    let reports = ctx.projections();
    write_csv(&reports, fs::File::create(&cfg.output)?)?;
    log::info!(target: "project", "wrote {} rows to {:?}", reports.len(), cfg.output);

    let names: Vec<&str> = cfg.debug_regions.iter().map(|s| s.as_str()).collect();
    for trace in ctx.traces(&names)? {
        let path = cfg.trace_dir.join(format!("{}.csv", trace.region()));
        trace.render_csv(fs::File::create(&path)?)?;

        if cfg.verbose {
            println!("{}", trace.title());
            let active = trace.active();
            print!("{}", render_band(active.center(), active.max(), 60));
        }
    }

    if cfg.verbose {
        for name in &names {
            if let Some(est) = ctx.estimate(name) {
                println!("{}: testing bias", name);
                print!("{}", render_vbars(est.biases(), 10));
            }
        }
    }
    return Ok(());
}
