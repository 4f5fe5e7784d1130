//! Approximate row solver: a width-bounded beam search over the same
//! per-column state graph the exact solver uses.
//!
//! At each column the frontier of candidate states is expanded and then
//! truncated to `beam_width` entries, keeping the lowest-cost ones. If no
//! column ever needed truncation (the raw frontier never exceeded
//! `beam_width`), the result is provably identical to the exact solve and
//! `RowSolution::proven_optimal` is set.
//!
//! Truncation ties are broken first by cost, then by a secondary key
//! derived only from `use_within` urgency (how close any yarn is to its
//! placement deadline) -- `cross_within` urgency is deliberately **not**
//! part of that key. This makes the two constraints behave asymmetrically
//! under pruning; it is a known property of this search, not an oversight.

use std::collections::BTreeMap;

use crate::error::DitherError;
use crate::state::State;
use crate::tie_break::TieBreaker;

use super::{Cost, RowMetrics, INFEASIBLE};

pub struct RowSolution {
    pub yarns: Vec<u8>,
    pub metrics: RowMetrics,
    pub proven_optimal: bool,
}

/// Scoring key used only to break cost ties when truncating the frontier:
/// the longest a yarn has gone unused. Derived purely from `last_used`,
/// so it never reflects `cross_within` urgency.
fn use_within_urgency(state: &State) -> u8 {
    state.last_used.iter().cloned().max().unwrap_or(0)
}

pub fn solve_row(
    pixel_costs: &[Vec<Cost>],
    use_within: u32,
    cross_within: u32,
    beam_width: usize,
    row: usize,
    tie_breaker: &mut TieBreaker,
) -> Result<RowSolution, DitherError> {
    let width = pixel_costs.len();
    let k = pixel_costs.first().map(|c| c.len()).unwrap_or(0);
    let started = std::time::Instant::now();

    let mut layers: Vec<BTreeMap<State, Cost>> = Vec::with_capacity(width + 1);
    layers.push(BTreeMap::from([(State::initial(k), 0.0)]));

    let mut pruned_any = false;

    for x in 0..width {
        let mut candidates: Vec<(State, Cost, u8)> = Vec::new();
        for (state, &cost) in &layers[x] {
            for (yarn, next_state) in state.next_states(use_within, cross_within, x as u32) {
                let next_cost = cost + pixel_costs[x][yarn as usize];
                candidates.push((next_state, next_cost, use_within_urgency(state)));
            }
        }

        if candidates.is_empty() {
            return Err(DitherError::Infeasible {
                row,
                use_within,
                cross_within,
            });
        }

        // Dedupe: keep the cheapest cost to reach each state.
        let mut merged: BTreeMap<State, (Cost, u8)> = BTreeMap::new();
        for (state, cost, urgency) in candidates {
            merged
                .entry(state)
                .and_modify(|entry| {
                    if cost < entry.0 {
                        *entry = (cost, urgency);
                    }
                })
                .or_insert((cost, urgency));
        }

        let mut ranked: Vec<(State, Cost, u8)> =
            merged.into_iter().map(|(s, (c, u))| (s, c, u)).collect();
        ranked.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap()
                .then(a.2.cmp(&b.2))
                .then(a.0.cmp(&b.0))
        });

        if ranked.len() > beam_width {
            pruned_any = true;
            ranked.truncate(beam_width);
        }

        layers.push(ranked.into_iter().map(|(s, c, _)| (s, c)).collect());
    }

    let mut ties = 0u64;
    let final_layer = layers.last().unwrap();
    let best_cost = final_layer.values().cloned().fold(INFEASIBLE, Cost::min);
    let candidates: Vec<&State> = final_layer
        .iter()
        .filter(|(_, &c)| c == best_cost)
        .map(|(s, _)| s)
        .collect();
    let mut state = candidates[tie_breaker.pick(row, candidates.len(), &mut ties)].clone();

    let mut yarns = vec![0u8; width];
    for x in (0..width).rev() {
        let mut matches = Vec::new();
        for (prev_state, &prev_cost) in &layers[x] {
            for (yarn, next_state) in prev_state.next_states(use_within, cross_within, x as u32) {
                if next_state == state {
                    let candidate_cost = prev_cost + pixel_costs[x][yarn as usize];
                    if candidate_cost == layers[x + 1][&state] {
                        matches.push((yarn, prev_state.clone()));
                    }
                }
            }
        }
        debug_assert!(!matches.is_empty());
        let (yarn, prev_state) = matches[tie_breaker.pick(row, matches.len(), &mut ties)].clone();
        yarns[x] = yarn;
        state = prev_state;
    }

    Ok(RowSolution {
        yarns,
        metrics: RowMetrics {
            elapsed: started.elapsed(),
            ties,
            terminal_cost: best_cost,
        },
        proven_optimal: !pruned_any,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LinearRgb;
    use crate::cost::CostMetric;
    use crate::palette::Palette;

    fn red_palette() -> Palette {
        Palette::new(vec![
            LinearRgb::new(1.0, 0.0, 0.0),
            LinearRgb::new(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn wide_beam_is_proven_optimal_on_unconstrained_row() {
        let palette = red_palette();
        let pixels = vec![LinearRgb::new(1.0, 0.0, 0.0); 4];
        let costs = super::super::precompute_row_costs(&pixels, &palette, CostMetric::Linear);
        let mut tb = TieBreaker::new(0);
        let solution = solve_row(&costs, 0, 0, 8, 0, &mut tb).unwrap();
        assert!(solution.proven_optimal);
        assert_eq!(solution.yarns, vec![0, 0, 0, 0]);
    }

    #[test]
    fn narrow_beam_still_satisfies_hard_constraints() {
        let palette = red_palette();
        let pixels = vec![LinearRgb::new(1.0, 0.0, 0.0); 10];
        let costs = super::super::precompute_row_costs(&pixels, &palette, CostMetric::Linear);
        let mut tb = TieBreaker::new(0);
        let solution = solve_row(&costs, 2, 0, 1, 0, &mut tb).unwrap();
        for w in solution.yarns.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn infeasible_row_reports_error() {
        let palette = Palette::new(vec![LinearRgb::new(1.0, 0.0, 0.0)]).unwrap();
        let pixels = vec![LinearRgb::new(1.0, 0.0, 0.0); 6];
        let costs = super::super::precompute_row_costs(&pixels, &palette, CostMetric::Linear);
        let mut tb = TieBreaker::new(0);
        let result = solve_row(&costs, 0, 3, 4, 0, &mut tb);
        assert!(result.is_err());
    }
}
