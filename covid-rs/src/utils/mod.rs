mod ascii_plot;
mod functions;
mod stats;

pub use ascii_plot::*;
pub use functions::*;
pub use stats::*;
