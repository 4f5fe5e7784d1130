//! Exact row solver: forward min-cost relaxation over the table stack,
//! optionally parallelized across destination states, followed by a
//! backward reconstruction of the winning path.
//!
//! The backward pass recomputes each edge's cost with the same addition
//! order the forward pass used (`min_cost[x][from] + yarn_cost`), so the
//! two must agree bitwise -- that equality is asserted in debug builds
//! and is what makes path reconstruction trustworthy instead of merely
//! plausible.

use crate::error::DitherError;
use crate::pool::WorkerPool;
use crate::table::{unpack, TableStack};
use crate::tie_break::TieBreaker;

use super::{Cost, RowMetrics, INFEASIBLE};

pub struct RowSolution {
    pub yarns: Vec<u8>,
    pub metrics: RowMetrics,
}

/// Solve one row exactly: every stitch assignment is jointly optimal
/// under the two windowed constraints.
pub fn solve_row(
    tables: &TableStack,
    pixel_costs: &[Vec<Cost>],
    pool: Option<&WorkerPool>,
    row: usize,
    use_within: u32,
    cross_within: u32,
    tie_breaker: &mut TieBreaker,
) -> Result<RowSolution, DitherError> {
    let width = pixel_costs.len();
    let started = std::time::Instant::now();

    let mut min_cost: Vec<Vec<Cost>> = Vec::with_capacity(width + 1);
    min_cost.push(vec![0.0; tables.initial_table().states.len()]);

    for x in 0..width {
        let table = tables.table_for_column(x);
        let mut next = vec![INFEASIBLE; table.states.len()];
        relax_column(table, &min_cost[x], &pixel_costs[x], &mut next, pool);
        min_cost.push(next);
    }

    let mut ties = 0u64;
    let final_costs = &min_cost[width];
    let best = final_costs.iter().cloned().fold(INFEASIBLE, Cost::min);
    if !best.is_finite() {
        return Err(DitherError::Infeasible {
            row,
            use_within,
            cross_within,
        });
    }
    let candidates: Vec<u32> = final_costs
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == best)
        .map(|(i, _)| i as u32)
        .collect();
    let mut state = candidates[tie_breaker.pick(row, candidates.len(), &mut ties)];

    let mut yarns = vec![0u8; width];
    for x in (0..width).rev() {
        let table = tables.table_for_column(x);
        let edges = table.edges_into(state as usize);
        let target = min_cost[x + 1][state as usize];

        let mut matches = Vec::new();
        for &edge in edges {
            let (yarn, from) = unpack(edge);
            let candidate_cost = min_cost[x][from as usize] + pixel_costs[x][yarn as usize];
            if candidate_cost == target {
                matches.push((yarn, from));
            }
        }
        debug_assert!(
            !matches.is_empty(),
            "backtrack found no predecessor reproducing the forward-pass cost at column {x}"
        );
        let (yarn, from) = matches[tie_breaker.pick(row, matches.len(), &mut ties)];
        yarns[x] = yarn;
        state = from;
    }

    Ok(RowSolution {
        yarns,
        metrics: RowMetrics {
            elapsed: started.elapsed(),
            ties,
            terminal_cost: best,
        },
    })
}

fn relax_column(
    table: &crate::table::Table,
    prev_costs: &[Cost],
    yarn_costs: &[Cost],
    next_costs: &mut [Cost],
    pool: Option<&WorkerPool>,
) {
    let meaningful_partitions = table.worker_slices.len().saturating_sub(1);
    match pool {
        Some(pool) if meaningful_partitions > 1 => {
            relax_range_parallel(pool, table, prev_costs, yarn_costs, next_costs);
        }
        _ => relax_range(table, 0, table.states.len(), prev_costs, yarn_costs, next_costs),
    }
}

fn relax_range(
    table: &crate::table::Table,
    start: usize,
    end: usize,
    prev_costs: &[Cost],
    yarn_costs: &[Cost],
    next_costs: &mut [Cost],
) {
    for to in start..end {
        let mut best = INFEASIBLE;
        for &edge in table.edges_into(to) {
            let (yarn, from) = unpack(edge);
            let c = prev_costs[from as usize] + yarn_costs[yarn as usize];
            if c < best {
                best = c;
            }
        }
        next_costs[to - start] = best;
    }
}

fn relax_range_parallel(
    pool: &WorkerPool,
    table: &crate::table::Table,
    prev_costs: &[Cost],
    yarn_costs: &[Cost],
    next_costs: &mut [Cost],
) {
    let boundaries = &table.worker_slices;
    let mut rest = next_costs;
    let mut starts = Vec::with_capacity(boundaries.len() - 1);
    let mut slices = Vec::with_capacity(boundaries.len() - 1);
    for w in boundaries.windows(2) {
        let (start, end) = (w[0] as usize, w[1] as usize);
        let (left, right) = rest.split_at_mut(end - start);
        starts.push(start);
        slices.push(left);
        rest = right;
    }

    // SAFETY: `table`, `prev_costs`, `yarn_costs` are borrowed read-only
    // for the duration of this function, and each `slice` is a disjoint
    // sub-borrow of `next_costs`; `pool.wait()` below blocks until every
    // submitted job has returned before any of these borrows end.
    unsafe {
        for (start, slice) in starts.into_iter().zip(slices.into_iter()) {
            pool.run(Box::new(move || {
                for (offset, cost) in slice.iter_mut().enumerate() {
                    let to = start + offset;
                    let mut best = INFEASIBLE;
                    for &edge in table.edges_into(to) {
                        let (yarn, from) = unpack(edge);
                        let c = prev_costs[from as usize] + yarn_costs[yarn as usize];
                        if c < best {
                            best = c;
                        }
                    }
                    *cost = best;
                }
            }));
        }
    }
    pool.wait();
}
