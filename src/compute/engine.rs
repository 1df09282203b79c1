//! Sparse Game of Life engine.
//!
//! The board state is only the set of live cells. A cell can only change
//! state if it is live or adjacent to a live cell, so each generation only
//! evaluates the live set and its neighbor closure. Cost scales with the
//! population rather than the board area.

use std::collections::HashSet;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Integer cell coordinate `(x, y)`.
pub type Cell = (i32, i32);

/// Set of live cells. Dead cells are never stored.
pub type CellSet = HashSet<Cell>;

/// Moore neighborhood offsets.
const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Live population above which candidate evaluation runs on the rayon pool.
#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 2048;

/// Inclusive board extent: valid cells satisfy `0 <= x <= x_max`, `0 <= y <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_max: i32,
    pub y_max: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x_max: 100,
            y_max: 100,
        }
    }
}

impl Bounds {
    pub fn new(x_max: i32, y_max: i32) -> Self {
        Self { x_max, y_max }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        0 <= x && x <= self.x_max && 0 <= y && y <= self.y_max
    }

    /// Number of addressable cells, `(x_max + 1) * (y_max + 1)`.
    pub fn area(&self) -> usize {
        if self.x_max < 0 || self.y_max < 0 {
            return 0;
        }
        (self.x_max as usize + 1) * (self.y_max as usize + 1)
    }
}

/// How many cells a random seeding should activate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedAmount {
    /// Fraction of `x_max * y_max`.
    Density(f64),
    /// Absolute number of draws.
    Count(usize),
}

impl SeedAmount {
    /// Interpret a single seeding parameter: below 1 it is a density,
    /// otherwise a count.
    pub fn from_p(p: f64) -> Self {
        if p.is_nan() || p <= 0.0 {
            SeedAmount::Count(0)
        } else if p < 1.0 {
            SeedAmount::Density(p)
        } else {
            SeedAmount::Count(p as usize)
        }
    }

    /// Number of draws for the given bounds, before clamping.
    pub fn draws(&self, bounds: Bounds) -> usize {
        match *self {
            SeedAmount::Density(p) => {
                let cells = bounds.x_max.max(0) as f64 * bounds.y_max.max(0) as f64;
                (cells * p).floor() as usize
            }
            SeedAmount::Count(n) => n,
        }
    }
}

/// Conway's Game of Life over a sparse live-cell set on a bounded,
/// non-wrapping board.
#[derive(Debug, Clone)]
pub struct LifeEngine {
    cells: CellSet,
    bounds: Bounds,
    rng: StdRng,
}

impl Default for LifeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LifeEngine {
    /// Create an empty engine with default bounds.
    pub fn new() -> Self {
        Self::with_bounds(Bounds::default())
    }

    /// Create an empty engine with the given bounds.
    pub fn with_bounds(bounds: Bounds) -> Self {
        Self {
            cells: CellSet::new(),
            bounds,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a deterministic random source for seeding.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Current live cells.
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Replace the live set (e.g. after placing a pattern).
    pub fn set_cells(&mut self, cells: CellSet) {
        self.cells = cells;
    }

    /// Union additional cells into the live set.
    pub fn extend_cells<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        self.cells.extend(cells);
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// Neighbors of `(x, y)` that lie on the board. Positions past the edge
    /// (or past the `i32` range) are omitted, there is no wraparound.
    pub fn neighbors(&self, x: i32, y: i32) -> impl Iterator<Item = Cell> + '_ {
        let bounds = self.bounds;
        OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| Some((x.checked_add(dx)?, y.checked_add(dy)?)))
            .filter(move |&(nx, ny)| bounds.contains(nx, ny))
    }

    #[inline]
    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.cells.contains(&(x, y))
    }

    /// Count of live on-board neighbors, in `0..=8`.
    pub fn live_neighbor_count(&self, x: i32, y: i32) -> usize {
        self.neighbors(x, y)
            .filter(|&(nx, ny)| self.is_alive(nx, ny))
            .count()
    }

    /// Kill every cell. Bounds are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Activate random cells in addition to the current live set.
    ///
    /// `p < 1` is a density of `x_max * y_max`, `p >= 1` an absolute count.
    /// Draws are with replacement, so duplicates collapse into the set. The
    /// number of draws is clamped to the board area. Returns the number of
    /// draws performed.
    pub fn seed_random(&mut self, p: f64) -> usize {
        let amount = SeedAmount::from_p(p);
        let requested = amount.draws(self.bounds);
        let draws = requested.min(self.bounds.area());
        if draws < requested {
            log::debug!(
                "Clamped random seeding from {} to {} draws (board area)",
                requested,
                draws
            );
        }

        let Bounds { x_max, y_max } = self.bounds;
        for _ in 0..draws {
            let x = self.rng.gen_range(0..=x_max);
            let y = self.rng.gen_range(0..=y_max);
            self.cells.insert((x, y));
        }
        draws
    }

    /// Advance one generation.
    ///
    /// New bounds, when given, take effect before the transition and persist
    /// for later calls. A live cell survives with 2 or 3 live neighbors; a
    /// dead cell next to a live one is born with exactly 3. The new live set
    /// replaces the old one in a single assignment.
    pub fn step(&mut self, new_x_max: Option<i32>, new_y_max: Option<i32>) -> &CellSet {
        if let Some(x_max) = new_x_max {
            self.bounds.x_max = x_max;
        }
        if let Some(y_max) = new_y_max {
            self.bounds.y_max = y_max;
        }

        let next = self.next_generation();
        self.cells = next;
        &self.cells
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn next_generation(&self) -> CellSet {
        if self.cells.len() > PARALLEL_THRESHOLD {
            self.cells
                .par_iter()
                .flat_map_iter(|&cell| self.births_and_survivals(cell))
                .collect()
        } else {
            self.cells
                .iter()
                .flat_map(|&cell| self.births_and_survivals(cell))
                .collect()
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn next_generation(&self) -> CellSet {
        self.cells
            .iter()
            .flat_map(|&cell| self.births_and_survivals(cell))
            .collect()
    }

    /// Cells in the neighborhood of the live `cell` that are alive next
    /// generation: the cell itself if it survives, and any dead neighbor
    /// with exactly three live neighbors. Shared candidates may be yielded
    /// more than once; the set collapses them.
    fn births_and_survivals(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let (x, y) = cell;
        let survives = matches!(self.live_neighbor_count(x, y), 2 | 3);
        let births = self
            .neighbors(x, y)
            .filter(move |&(nx, ny)| !self.is_alive(nx, ny) && self.live_neighbor_count(nx, ny) == 3);
        survives.then_some(cell).into_iter().chain(births)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(cells: &[Cell], bounds: Bounds) -> LifeEngine {
        let mut engine = LifeEngine::with_bounds(bounds).with_rng_seed(7);
        engine.set_cells(cells.iter().copied().collect());
        engine
    }

    fn set(cells: &[Cell]) -> CellSet {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let engine = LifeEngine::with_bounds(Bounds::new(2, 2));
        let mut n: Vec<Cell> = engine.neighbors(0, 0).collect();
        n.sort();
        assert_eq!(n, vec![(0, 1), (1, 0), (1, 1)]);

        let interior: Vec<Cell> = engine.neighbors(1, 1).collect();
        assert_eq!(interior.len(), 8);
    }

    #[test]
    fn test_neighbor_count() {
        let engine = engine_with(&[(0, 1), (1, 1), (2, 1)], Bounds::new(2, 2));
        assert_eq!(engine.live_neighbor_count(1, 1), 2);
        assert_eq!(engine.live_neighbor_count(1, 0), 3);
        assert_eq!(engine.live_neighbor_count(0, 0), 2);
        assert!(engine.is_alive(2, 1));
        assert!(!engine.is_alive(2, 2));
    }

    #[test]
    fn test_cells_at_coordinate_limits() {
        let mut engine = engine_with(&[(i32::MIN, 0), (0, i32::MIN)], Bounds::default());
        assert!(engine.step(None, None).is_empty());

        // A blinker against the right edge of a maximal board.
        let edge = i32::MAX;
        let mut engine = engine_with(&[(edge, 0), (edge, 1), (edge, 2)], Bounds::new(edge, 10));
        assert_eq!(engine.neighbors(edge, 1).count(), 5);
        engine.step(None, None);
        assert_eq!(engine.cells(), &set(&[(edge - 1, 1), (edge, 1)]));
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut engine = engine_with(&[(0, 1), (1, 1), (2, 1)], Bounds::default());
        engine.step(Some(2), Some(2));
        assert_eq!(engine.cells(), &set(&[(1, 0), (1, 1), (1, 2)]));
        engine.step(Some(2), Some(2));
        assert_eq!(engine.cells(), &set(&[(0, 1), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut engine = engine_with(&[(1, 1)], Bounds::default());
        assert!(engine.step(Some(2), Some(2)).is_empty());
    }

    #[test]
    fn test_shrunk_bounds_clip_births() {
        let mut engine = engine_with(&[(0, 1), (1, 1), (2, 1)], Bounds::default());
        engine.step(Some(2), Some(1));
        assert_eq!(engine.cells(), &set(&[(1, 0), (1, 1)]));
        engine.step(Some(2), Some(1));
        assert!(engine.cells().is_empty());
    }

    #[test]
    fn test_block_is_still_life() {
        let block = set(&[(4, 4), (4, 5), (5, 4), (5, 5)]);
        let mut engine = LifeEngine::with_bounds(Bounds::new(10, 10));
        engine.set_cells(block.clone());
        for _ in 0..5 {
            assert_eq!(engine.step(None, None), &block);
        }
    }

    #[test]
    fn test_bounds_persist_between_steps() {
        let mut engine = engine_with(&[(1, 1)], Bounds::default());
        engine.step(Some(20), Some(30));
        engine.step(None, None);
        assert_eq!(engine.bounds(), Bounds::new(20, 30));
        engine.step(Some(5), None);
        assert_eq!(engine.bounds(), Bounds::new(5, 30));
    }

    #[test]
    fn test_clear_keeps_bounds() {
        let mut engine = engine_with(&[(1, 1), (2, 2)], Bounds::new(9, 9));
        engine.clear();
        assert_eq!(engine.population(), 0);
        assert_eq!(engine.bounds(), Bounds::new(9, 9));
    }

    #[test]
    fn test_seed_random_density() {
        let mut engine = LifeEngine::with_bounds(Bounds::new(50, 40)).with_rng_seed(1);
        let draws = engine.seed_random(0.2);
        assert_eq!(draws, 400);
        assert!(engine.population() > 0);
        assert!(engine.population() <= 400);
        let bounds = engine.bounds();
        assert!(engine.cells().iter().all(|&(x, y)| bounds.contains(x, y)));
    }

    #[test]
    fn test_seed_random_count_is_additive() {
        let mut engine = engine_with(&[(0, 0)], Bounds::new(100, 100));
        engine.seed_random(25.0);
        assert!(engine.is_alive(0, 0));
        assert!(engine.population() > 1);
        assert!(engine.population() <= 26);
    }

    #[test]
    fn test_seed_random_clamped_to_area() {
        let mut engine = LifeEngine::with_bounds(Bounds::new(2, 2)).with_rng_seed(3);
        let draws = engine.seed_random(1_000_000.0);
        assert_eq!(draws, 9);
        assert!(engine.population() <= 9);
    }

    #[test]
    fn test_seed_amount_interpretation() {
        assert_eq!(SeedAmount::from_p(0.5), SeedAmount::Density(0.5));
        assert_eq!(SeedAmount::from_p(1.0), SeedAmount::Count(1));
        assert_eq!(SeedAmount::from_p(100.7), SeedAmount::Count(100));
        assert_eq!(SeedAmount::from_p(-3.0), SeedAmount::Count(0));
        assert_eq!(SeedAmount::from_p(f64::NAN), SeedAmount::Count(0));
        assert_eq!(SeedAmount::Density(0.25).draws(Bounds::new(10, 10)), 25);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        // Large enough to cross the parallel threshold.
        let mut big = LifeEngine::with_bounds(Bounds::new(199, 199)).with_rng_seed(11);
        big.seed_random(0.3);
        assert!(big.population() > 2048);

        let reference = big.clone();
        let expected: CellSet = reference
            .cells
            .iter()
            .flat_map(|&c| reference.births_and_survivals(c))
            .collect();

        assert_eq!(big.step(None, None), &expected);
    }
}
