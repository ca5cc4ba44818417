// File: crates/stockchart-core/src/grid.rs
// Summary: Grid and tick placement for the price and time scales.

use crate::scale::LogicalRange;

/// `steps` evenly spaced values from `start` to `end`, both ends included.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Bar indices that get a time label: every `step`-th bar inside `range`, where the step
/// keeps neighbouring labels at least `min_spacing` pixels apart.
pub fn time_label_indices(range: LogicalRange, len: usize, bar_spacing: f32, min_spacing: f32) -> Vec<usize> {
    if len == 0 || bar_spacing <= 0.0 {
        return Vec::new();
    }
    let step = (min_spacing / bar_spacing).ceil().max(1.0) as usize;
    let last = len as f64 - 1.0;
    let first = range.from.ceil().clamp(0.0, last) as usize;
    let end = range.to.floor().clamp(0.0, last) as usize;
    if first > end {
        return Vec::new();
    }
    (first..=end).step_by(step).collect()
}
