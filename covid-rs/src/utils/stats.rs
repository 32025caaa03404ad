use crate::prelude::{Real, INF};
use serde::{Deserialize, Serialize};

/// Statistics over a sample of weighted observations.
///
/// Weights do not need to be normalized. Observations with non-positive or
/// non-finite weight are ignored.
pub trait WeightedStats {
    fn add(&mut self, x: Real, weight: Real);
    fn add_many<I>(&mut self, xs: I)
    where
        I: IntoIterator<Item = (Real, Real)>,
    {
        for (x, w) in xs {
            self.add(x, w);
        }
    }
    fn size(&self) -> usize;
    fn total_weight(&self) -> Real;
    fn mean(&self) -> Real;
    fn var(&self) -> Real;
    fn min(&self) -> Real;
    fn max(&self) -> Real;
    fn std(&self) -> Real {
        self.var().sqrt()
    }
    fn stats(&self) -> PointStats {
        PointStats {
            mean: self.mean(),
            std: self.std(),
            min: self.min(),
            max: self.max(),
            size: self.size(),
        }
    }
}

/// Stores all observations and computes moments in two passes, which keeps
/// the variance exact for nearly constant samples (e.g., growth ratios close
/// to 1).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedStatsVec {
    data: Vec<(Real, Real)>,
}

impl WeightedStatsVec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeightedStats for WeightedStatsVec {
    fn add(&mut self, x: Real, weight: Real) {
        if weight > 0.0 && weight.is_finite() && x.is_finite() {
            self.data.push((x, weight));
        }
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn total_weight(&self) -> Real {
        self.data.iter().map(|(_, w)| w).sum()
    }

    /// Weighted mean or zero for empty samples.
    fn mean(&self) -> Real {
        let tot = self.total_weight();
        if tot <= 0.0 {
            return 0.0;
        }
        self.data.iter().map(|(x, w)| x * w).sum::<Real>() / tot
    }

    /// Weighted population variance or zero for empty samples.
    fn var(&self) -> Real {
        let tot = self.total_weight();
        if tot <= 0.0 {
            return 0.0;
        }
        let m = self.mean();
        self.data
            .iter()
            .map(|(x, w)| w * sqr(x - m))
            .sum::<Real>()
            / tot
    }

    fn min(&self) -> Real {
        self.data.iter().fold(INF, |acc, (x, _)| acc.min(*x))
    }

    fn max(&self) -> Real {
        self.data.iter().fold(-INF, |acc, (x, _)| acc.max(*x))
    }
}

#[inline]
pub fn sqr(x: Real) -> Real {
    x * x
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct PointStats {
    pub mean: Real,
    pub std: Real,
    pub min: Real,
    pub max: Real,
    pub size: usize,
}
