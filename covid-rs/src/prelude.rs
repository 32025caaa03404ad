pub use crate::data::{Dataset, Region, RegionAttributes, RegionSeries};
pub use crate::error::{Error, Result};
pub use crate::models::{CompartmentHistory, CompartmentState, Ensemble, Envelope, Trajectory};
pub use crate::params::ModelParams;
pub use crate::report::{Band, ProjectionResult, RegionReport};
pub use crate::sim::{AnalysisContext, RegionEstimate, RegionTrace};

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;
pub(crate) const INF: Real = Real::INFINITY;

/// Index of a day in a daily series. Day 0 is the first observed date of the
/// dataset (or the simulation start, for projected trajectories).
pub type Day = usize;

/// Projection horizon, in days after the simulation start.
pub type Horizon = usize;
