use std::iter;

use crate::prelude::{Real, INF};

/// ASCII plot of a sequence of positive values.
///
/// Draw each point as a column filled with '*'s up to the maximum height.
pub fn render_vbars(value: &[Real], height: usize) -> String {
    let mut out = String::new();
    if value.is_empty() || height == 0 {
        return out;
    }
    let max = value.iter().cloned().fold(-INF, |x, y| x.max(y));
    if max <= 0.0 {
        return out;
    }
    let step = max / height as Real;

    for i in 0..height + 1 {
        let h = (height - i) as Real * step;
        out.extend(value.iter().map(|&x| if x >= h { '*' } else { ' ' }));
        out.push('\n');
    }
    return out;
}

/// ASCII plot of a projected band: each row is a day, '=' fills up to the
/// center value and '-' marks the spread up to the maximum.
pub fn render_band(center: &[Real], max: &[Real], width: usize) -> String {
    let mut out = String::new();
    let top = max.iter().cloned().fold(-INF, |x, y| x.max(y));
    if center.is_empty() || width == 0 || top <= 0.0 {
        return out;
    }
    let step = top / width as Real;

    for (day, (&c, &m)) in center.iter().zip(max.iter()).enumerate() {
        let n = (c / step) as usize;
        let k = ((m / step) as usize).max(n) - n;
        out.push_str(&format!("{:>4} |", day));
        out.extend(iter::repeat('=').take(n));
        out.extend(iter::repeat('-').take(k));
        out.push('\n');
    }
    return out;
}
