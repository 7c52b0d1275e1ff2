//! Rainflow cycle counting (ASTM E1049 three-point method).

use hs_core::round_to;

/// A counted cycle: range between its two reversals and 0.5 or 1.0 cycles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle {
    pub range: f64,
    pub mean: f64,
    pub count: f64,
}

/// Turning points of the series, including both end points.
///
/// Consecutive duplicates are skipped; a point is a reversal only when the
/// slope changes sign strictly.
pub fn reversals(series: &[f64]) -> Vec<f64> {
    let mut out = Vec::new();
    let mut iter = series.iter().copied();
    let (Some(first), Some(mut x)) = (iter.next(), iter.next()) else {
        return out;
    };
    out.push(first);
    let mut d_last = x - first;
    for x_next in iter {
        if x_next == x {
            continue;
        }
        let d_next = x_next - x;
        if d_last * d_next < 0.0 {
            out.push(x);
        }
        x = x_next;
        d_last = d_next;
    }
    out.push(x);
    out
}

fn cycle(a: f64, b: f64, count: f64) -> Cycle {
    Cycle {
        range: (a - b).abs(),
        mean: 0.5 * (a + b),
        count,
    }
}

/// Extract full and half cycles from a series.
pub fn extract_cycles(series: &[f64]) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut points: Vec<f64> = Vec::new();
    // Index of the first live point; half cycles pop from the front.
    let mut head = 0;

    for point in reversals(series) {
        points.push(point);
        while points.len() - head >= 3 {
            let n = points.len();
            let x = (points[n - 2] - points[n - 1]).abs();
            let y = (points[n - 3] - points[n - 2]).abs();
            if x < y {
                break;
            }
            if n - head == 3 {
                cycles.push(cycle(points[head], points[head + 1], 0.5));
                head += 1;
            } else {
                cycles.push(cycle(points[n - 3], points[n - 2], 1.0));
                let last = points[n - 1];
                points.truncate(n - 3);
                points.push(last);
            }
        }
    }

    while points.len() - head > 1 {
        cycles.push(cycle(points[head], points[head + 1], 0.5));
        head += 1;
    }
    cycles
}

/// Cycle counts per range, ranges rounded to `ndigits` decimals, sorted by range.
pub fn count_cycles(series: &[f64], ndigits: u32) -> Vec<(f64, f64)> {
    let mut counts: Vec<(f64, f64)> = Vec::new();
    for c in extract_cycles(series) {
        let range = round_to(c.range, ndigits);
        match counts.iter_mut().find(|(r, _)| *r == range) {
            Some((_, n)) => *n += c.count,
            None => counts.push((range, c.count)),
        }
    }
    counts.sort_by(|a, b| a.0.total_cmp(&b.0));
    counts
}
