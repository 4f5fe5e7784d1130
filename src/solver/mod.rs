//! Row solvers: turn a column of pixel-yarn costs plus a state-transition
//! table into a chosen yarn per stitch.

pub mod beam;
pub mod optimal;

use crate::color::LinearRgb;
use crate::cost::CostMetric;
use crate::palette::Palette;

/// A relaxation cost. `INFEASIBLE` marks a state with no valid path
/// reaching it yet.
pub type Cost = f32;
pub const INFEASIBLE: Cost = f32::INFINITY;

/// Per-row observability: how long the solve took, how many randomized
/// ties it resolved, and the winning path's total cost.
#[derive(Debug, Clone, Copy)]
pub struct RowMetrics {
    pub elapsed: std::time::Duration,
    pub ties: u64,
    pub terminal_cost: Cost,
}

/// Precompute the cost of placing each yarn at each pixel in a row, once
/// per pixel-yarn pair, so the relaxation loop only ever does an array
/// lookup.
pub fn precompute_row_costs(row_pixels: &[LinearRgb], palette: &Palette, metric: CostMetric) -> Vec<Vec<Cost>> {
    row_pixels
        .iter()
        .map(|&pixel| {
            (0..palette.len())
                .map(|y| metric.cost(pixel, palette.color(y)))
                .collect()
        })
        .collect()
}
