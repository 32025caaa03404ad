use super::{cumsum, daily_diffs};
use crate::prelude::Real;

/// Fill zero-diff days that follow a high volume day by spreading the
/// "catch up" day's cases over the zero days.
///
/// A zero is considered a missing measurement (rather than a true zero) when
/// the last accepted value is at least `threshold`. A positive value resolves
/// the pending run by distributing its mass evenly over the run plus itself.
/// Negative values (data corrections) flush the run as true zeros and pass
/// through unchanged, as does a run still pending at the end of the series.
///
/// The output has the same length and total mass as the input.
pub fn backfill_missing(diffs: &[Real], threshold: Real) -> Vec<Real> {
    let mut out = Vec::with_capacity(diffs.len());
    let (first, rest) = match diffs.split_first() {
        Some(split) => split,
        None => return out,
    };
    out.push(*first);
    let mut missing = 0usize;

    for &cur in rest {
        if cur == 0.0 {
            let prev = out.last().cloned().unwrap_or(0.0);
            if missing > 0 || prev >= threshold {
                missing += 1;
            } else {
                out.push(cur);
            }
        } else if cur > 0.0 {
            if missing > 0 {
                let share = cur / (missing + 1) as Real;
                out.extend(std::iter::repeat(share).take(missing + 1));
                missing = 0;
            } else {
                out.push(cur);
            }
        } else {
            out.extend(std::iter::repeat(0.0).take(missing));
            missing = 0;
            out.push(cur);
        }
    }
    out.extend(std::iter::repeat(0.0).take(missing));
    return out;
}

/// Backfill a cumulative series: diff, repair gaps and accumulate again.
pub fn backfill_cumulative(cumulative: &[Real], threshold: Real) -> Vec<Real> {
    cumsum(&backfill_missing(&daily_diffs(cumulative), threshold))
}
