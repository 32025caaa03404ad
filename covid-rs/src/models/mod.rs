//! Compartmental models: reconstruction of the historical Susceptible /
//! Active / Recovered split and its projection forward in time.
mod compartments;
mod ensemble;
mod sir;

pub use compartments::*;
pub use ensemble::*;
pub use sir::*;
