//! Per-run analysis: cached per-region estimates and their projections.
mod context;
mod projection;

pub use context::*;
pub use projection::*;
