//! Testing-bias corrected case estimates and SIR projections of COVID-19
//! indicators.
//!
//! The crate takes cumulative reported cases and deaths per region, repairs
//! reporting gaps, scales cases by a testing bias inferred from lagged
//! fatality rates and runs a small discrete-time SIR ensemble forward to
//! estimate ICU demand and the share of the population affected.
pub mod data;
pub mod error;
pub mod estimate;
pub mod models;
pub mod params;
pub mod prelude;
pub mod report;
pub mod series;
pub mod sim;
pub mod utils;
