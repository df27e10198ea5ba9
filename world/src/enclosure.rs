//! Territory-enclosure classifier for the trail-drawing variant.
//!
//! Triggered when the hero reconnects with the border mid-trail: the open
//! field is partitioned along the trail, the smaller region is permanently
//! marked, and the trail itself joins the marked territory.

use grid_skirmish_core::{Cell, Direction, GridPoint, PositionChange};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Random flood-seed probes attempted before falling back to a linear scan.
const SEED_PROBE_CAP: u32 = 1024;

/// Partitions the open region along the current trail and marks the smaller
/// side plus the trail.
///
/// Transient `Consider` marks are written without change records; only the
/// permanent conversions reach the renderer. Postcondition: the grid holds
/// no `Consider` and no `Trail` cells.
pub(crate) fn classify(grid: &mut super::Grid, rng: &mut ChaCha8Rng) {
    if let Some(seed) = flood_seed(grid, rng) {
        flood(grid, seed);

        let mut empty_count = 0usize;
        let mut considered_count = 0usize;
        for point in grid.points() {
            match grid.get(point) {
                Some(Cell::Empty) => empty_count += 1,
                Some(Cell::Consider) => considered_count += 1,
                _ => {}
            }
        }

        if empty_count < considered_count {
            // The flooded region is the larger one, so the untouched empty
            // cells form the smaller partition.
            for point in grid.points() {
                match grid.get(point) {
                    Some(Cell::Empty) => {
                        grid.update(PositionChange::point(point, Cell::Marked));
                    }
                    Some(Cell::Consider) => grid.set(point, Cell::Empty),
                    _ => {}
                }
            }
        } else {
            for point in grid.points() {
                if grid.get(point) == Some(Cell::Consider) {
                    grid.update(PositionChange::point(point, Cell::Marked));
                }
            }
        }
    }

    // The boundary the player drew becomes part of the marked territory in
    // both branches.
    for point in grid.points() {
        if grid.get(point) == Some(Cell::Trail) {
            grid.update(PositionChange::point(point, Cell::Marked));
        }
    }
}

/// Picks an empty flood seed strictly inside the border margins.
///
/// Random probes are capped and followed by a deterministic scan, so the
/// routine terminates even on a degenerate field with no empty interior.
fn flood_seed(grid: &super::Grid, rng: &mut ChaCha8Rng) -> Option<GridPoint> {
    let rows = grid.rows();
    let columns = grid.columns();
    if rows <= 2 || columns <= 2 {
        return None;
    }

    for _ in 0..SEED_PROBE_CAP {
        let probe = GridPoint::new(rng.gen_range(1..rows - 1), rng.gen_range(1..columns - 1));
        if grid.get(probe) == Some(Cell::Empty) {
            return Some(probe);
        }
    }

    for row in 1..rows - 1 {
        for col in 1..columns - 1 {
            let point = GridPoint::new(row, col);
            if grid.get(point) == Some(Cell::Empty) {
                return Some(point);
            }
        }
    }

    None
}

/// Iterative 4-adjacency flood fill marking every reachable empty cell as
/// `Consider`.
///
/// The flood never crosses trail, border, marked, or occupied cells, and is
/// bounded by the grid area.
fn flood(grid: &mut super::Grid, seed: GridPoint) {
    let mut stack = vec![seed];
    while let Some(point) = stack.pop() {
        if grid.get(point) != Some(Cell::Empty) {
            continue;
        }
        grid.set(point, Cell::Consider);
        for direction in Direction::ALL {
            stack.push(point.offset(direction));
        }
    }
}
