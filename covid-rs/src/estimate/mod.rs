//! Estimators deriving bias-corrected cases and transmission rates from the
//! reported series.
mod age_adjusted;
mod bias;
mod growth;

pub use age_adjusted::*;
pub use bias::*;
pub use growth::*;
