//! Per-column state-transition tables in CSR form.
//!
//! Building the full state graph column by column would grow without
//! bound for a wide row. Instead each column's table is built from the
//! previous one, and once the *set* of reachable states stops changing
//! (a fixed point, reached quickly for any reasonable window size) the
//! same table is reused for every remaining column.

use std::collections::{HashMap, HashSet};

use crate::state::State;

/// Bit width reserved for the yarn index in a packed edge. Matches
/// `palette::K_MAX` (31 yarns fit in 5 bits).
pub const YARN_SHIFT: u32 = 27;
const STATE_MASK: u32 = (1 << YARN_SHIFT) - 1;

/// Unpack a table edge into (yarn index, predecessor state index).
#[inline]
pub fn unpack(edge: u32) -> (u8, u32) {
    ((edge >> YARN_SHIFT) as u8, edge & STATE_MASK)
}

#[inline]
fn pack(yarn: u8, predecessor: u32) -> u32 {
    ((yarn as u32) << YARN_SHIFT) | (predecessor & STATE_MASK)
}

/// One column's state-transition table in CSR layout: `states[i]` is the
/// i-th reachable state, and `froms[first_from[i]..first_from[i+1]]` are
/// the packed `(yarn, predecessor)` edges leading into it, in ascending
/// packed order.
pub struct Table {
    pub states: Vec<State>,
    pub first_from: Vec<u32>,
    pub froms: Vec<u32>,
    /// Partition of `0..states.len()` into roughly equal-edge-count
    /// ranges, one per worker. Computed lazily once the worker count is
    /// known; empty until then.
    pub worker_slices: Vec<u32>,
}

impl Table {
    pub fn edges_into(&self, state: usize) -> &[u32] {
        &self.froms[self.first_from[state] as usize..self.first_from[state + 1] as usize]
    }

    fn edge_count(&self) -> usize {
        self.froms.len()
    }

    /// Split `0..states.len()` into `workers` ranges with roughly equal
    /// total edge counts, merging a state's full edge list into a single
    /// range (never splitting one state's predecessors across workers).
    pub fn assign_worker_slices(&mut self, workers: usize) {
        if workers <= 1 || self.states.is_empty() {
            self.worker_slices = vec![0, self.states.len() as u32];
            return;
        }
        let total = self.edge_count().max(1);
        let target_per_worker = total.div_ceil(workers);

        let mut slices = vec![0u32];
        let mut running = 0usize;
        for (i, _) in self.states.iter().enumerate() {
            running += self.edges_into(i).len();
            if running >= target_per_worker && (slices.len() as usize) < workers {
                slices.push((i + 1) as u32);
                running = 0;
            }
        }
        if *slices.last().unwrap() != self.states.len() as u32 {
            slices.push(self.states.len() as u32);
        }
        self.worker_slices = slices;
    }
}

/// A stack of per-column tables, with the last entry reused for every
/// column beyond where the table reached a fixed point.
pub struct TableStack {
    tables: Vec<Table>,
}

impl TableStack {
    /// The edge table whose `states` are reachable *after* placing
    /// column `x` (0-indexed), and whose edges reference predecessor
    /// indices into the table for column `x - 1` (or the pre-row initial
    /// state, for `x == 0`).
    pub fn table_for_column(&self, x: usize) -> &Table {
        let last = self.tables.len() - 1;
        &self.tables[(x + 1).min(last)]
    }

    /// The table of states reachable before any column has been placed
    /// (always a single state) -- the predecessor table for column 0.
    pub fn initial_table(&self) -> &Table {
        &self.tables[0]
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn assign_worker_slices(&mut self, workers: usize) {
        for table in &mut self.tables {
            table.assign_worker_slices(workers);
        }
    }
}

/// Build the table stack for a row of the given `width`, under the two
/// windowed constraints, for a palette of `k` yarns.
pub fn build_tables(width: usize, use_within: u32, cross_within: u32, k: usize) -> TableStack {
    let mut tables = vec![Table {
        states: vec![State::initial(k)],
        first_from: vec![0, 0],
        froms: Vec::new(),
        worker_slices: Vec::new(),
    }];

    for x in 0..width {
        let prev = tables.last().unwrap();
        let (next, steady) = build_next(prev, x as u32, use_within, cross_within);
        tables.push(next);
        if steady {
            break;
        }
    }

    TableStack { tables }
}

fn build_next(prev: &Table, x: u32, use_within: u32, cross_within: u32) -> (Table, bool) {
    let mut index_of: HashMap<State, u32> = HashMap::new();
    let mut next_states: Vec<State> = Vec::new();
    let mut buckets: Vec<Vec<u32>> = Vec::new();

    for s in 0..prev.states.len() {
        for (y, next_state) in prev.states[s].next_states(use_within, cross_within, x) {
            let to = *index_of.entry(next_state.clone()).or_insert_with(|| {
                next_states.push(next_state);
                buckets.push(Vec::new());
                (next_states.len() - 1) as u32
            });
            // `y` is fully determined by `next_state` itself (the one
            // index newly set to 1), so for a fixed `to` every edge we
            // push here shares the same `y` and an ascending `s`: the
            // packed values come out sorted with no extra work.
            buckets[to as usize].push(pack(y, s as u32));
        }
    }

    let is_fixed_point = prev.states.len() == next_states.len() && {
        let prev_set: HashSet<&State> = prev.states.iter().collect();
        next_states.iter().all(|s| prev_set.contains(s))
    };

    if is_fixed_point {
        let reindex: HashMap<State, u32> = prev
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as u32))
            .collect();
        let mut reordered = vec![Vec::new(); prev.states.len()];
        for (old_to, state) in next_states.into_iter().enumerate() {
            let new_to = reindex[&state] as usize;
            reordered[new_to] = std::mem::take(&mut buckets[old_to]);
        }
        let (first_from, froms) = flatten(reordered);
        return (
            Table {
                states: prev.states.clone(),
                first_from,
                froms,
                worker_slices: Vec::new(),
            },
            true,
        );
    }

    let (first_from, froms) = flatten(buckets);
    (
        Table {
            states: next_states,
            first_from,
            froms,
            worker_slices: Vec::new(),
        },
        false,
    )
}

fn flatten(buckets: Vec<Vec<u32>>) -> (Vec<u32>, Vec<u32>) {
    let mut first_from = Vec::with_capacity(buckets.len() + 1);
    let mut froms = Vec::new();
    for bucket in &buckets {
        first_from.push(froms.len() as u32);
        froms.extend_from_slice(bucket);
    }
    first_from.push(froms.len() as u32);
    (first_from, froms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_table_has_one_state_per_column() {
        let stack = build_tables(10, 0, 0, 3);
        // Column 0 always has exactly the initial state; by column 1 the
        // unconstrained case should already have hit its fixed point.
        assert!(stack.len() <= 3);
        let t = stack.table_for_column(5);
        assert_eq!(t.states.len(), 1);
    }

    #[test]
    fn reaches_fixed_point_within_a_few_columns() {
        let stack = build_tables(50, 3, 5, 4);
        assert!(stack.len() < 50, "table stack should short-circuit before width columns");
    }

    #[test]
    fn edges_into_each_state_are_ascending_packed() {
        let stack = build_tables(8, 2, 3, 3);
        let t = stack.table_for_column(3);
        for i in 0..t.states.len() {
            let edges = t.edges_into(i);
            for w in edges.windows(2) {
                assert!(w[0] < w[1], "edges not ascending: {:?}", edges);
            }
        }
    }

    #[test]
    fn worker_slices_cover_all_states_without_gaps() {
        let mut stack = build_tables(20, 2, 3, 3);
        stack.assign_worker_slices(4);
        let t = stack.table_for_column(10);
        assert_eq!(*t.worker_slices.first().unwrap(), 0);
        assert_eq!(*t.worker_slices.last().unwrap(), t.states.len() as u32);
    }
}
