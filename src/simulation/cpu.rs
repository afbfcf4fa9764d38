//! CPU reference backend
//!
//! Runs the seed, step and edit programs per cell on the CPU, using the same
//! per-pixel rules as the WGSL programs. Useful for headless runs and as the
//! reference the GPU output is checked against.

use super::grid::{CellCoord, CellGrid};
use super::rules;
use super::traits::{CellBackend, Operation, SurfaceIndex};
use crate::config::GridSize;
use crate::error::GfxError;

/// Two CPU grids standing in for the GPU surfaces
#[derive(Debug, Clone)]
pub struct CpuCells {
    surfaces: [CellGrid; 2],
    passes: u64,
}

impl CpuCells {
    /// Both surfaces start dead; callers seed explicitly.
    pub fn new(size: GridSize) -> Self {
        Self {
            surfaces: [CellGrid::new(size), CellGrid::new(size)],
            passes: 0,
        }
    }

    pub fn surface(&self, index: SurfaceIndex) -> &CellGrid {
        &self.surfaces[index.index()]
    }

    /// Number of program passes that wrote a surface.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn render(&self, operation: &Operation, source: &CellGrid) -> Option<CellGrid> {
        let size = source.size();
        let mut out = CellGrid::new(size);
        match operation {
            Operation::Idle => return None,
            Operation::Step => {
                for y in 0..size.height {
                    for x in 0..size.width {
                        let sum = rules::neighborhood_sum(source, x, y);
                        out.set(x, y, rules::step_cell(source.get(x, y), sum));
                    }
                }
            }
            Operation::Edit { cursor, paint } => {
                for y in 0..size.height {
                    for x in 0..size.width {
                        let here = CellCoord::new(x, y);
                        out.set(x, y, rules::edit_cell(source.get(x, y), here, *cursor, *paint));
                    }
                }
            }
            Operation::Seed { seed, alive_ratio } => {
                for y in 0..size.height {
                    for x in 0..size.width {
                        out.set(x, y, rules::seed_cell(x, y, size, *seed, *alive_ratio));
                    }
                }
            }
            Operation::Load(grid) => out = grid.cropped(size),
            Operation::Clear => {}
        }
        Some(out)
    }
}

impl CellBackend for CpuCells {
    fn size(&self) -> GridSize {
        self.surfaces[0].size()
    }

    fn apply(&mut self, operation: &Operation, source: SurfaceIndex, target: SurfaceIndex) {
        debug_assert!(
            !operation.reads_source() || source != target,
            "{} pass reads and writes {:?}",
            operation.name(),
            target
        );
        if let Some(next) = self.render(operation, &self.surfaces[source.index()]) {
            self.surfaces[target.index()] = next;
            self.passes += 1;
        }
    }

    fn resize(&mut self, size: GridSize) {
        let resized = [self.surfaces[0].cropped(size), self.surfaces[1].cropped(size)];
        self.surfaces = resized;
    }

    fn read_back(&self, index: SurfaceIndex) -> Result<CellGrid, GfxError> {
        Ok(self.surface(index).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::traits::Paint;

    fn blinker(size: GridSize) -> CellGrid {
        let mut grid = CellGrid::new(size);
        for y in 3..6 {
            grid.set(4, y, CellGrid::ALIVE);
        }
        grid
    }

    #[test]
    fn test_step_oscillates_blinker() {
        let size = GridSize::square(9);
        let mut cells = CpuCells::new(size);
        cells.apply(&Operation::Load(blinker(size)), SurfaceIndex::A, SurfaceIndex::A);
        cells.apply(&Operation::Step, SurfaceIndex::A, SurfaceIndex::B);

        let horizontal = cells.surface(SurfaceIndex::B);
        assert_eq!(horizontal.alive_count(), 3);
        assert!(horizontal.is_alive(3, 4) && horizontal.is_alive(4, 4) && horizontal.is_alive(5, 4));

        cells.apply(&Operation::Step, SurfaceIndex::B, SurfaceIndex::A);
        assert_eq!(cells.surface(SurfaceIndex::A), &blinker(size));
    }

    #[test]
    fn test_step_is_pure_function_of_input() {
        let size = GridSize::square(16);
        let mut first = CpuCells::new(size);
        let mut second = CpuCells::new(size);
        let seed = Operation::Seed {
            seed: 0.37,
            alive_ratio: 0.3,
        };
        first.apply(&seed, SurfaceIndex::B, SurfaceIndex::A);
        second.apply(&seed, SurfaceIndex::B, SurfaceIndex::A);
        first.apply(&Operation::Step, SurfaceIndex::A, SurfaceIndex::B);
        second.apply(&Operation::Step, SurfaceIndex::A, SurfaceIndex::B);
        assert_eq!(first.surface(SurfaceIndex::B), second.surface(SurfaceIndex::B));
    }

    #[test]
    fn test_idle_writes_nothing() {
        let mut cells = CpuCells::new(GridSize::square(4));
        cells.apply(&Operation::Idle, SurfaceIndex::A, SurfaceIndex::B);
        assert_eq!(cells.passes(), 0);
    }

    #[test]
    fn test_edit_paints_single_cell() {
        let size = GridSize::square(8);
        let mut cells = CpuCells::new(size);
        let edit = Operation::Edit {
            cursor: CellCoord::new(2, 6),
            paint: Paint::Alive,
        };
        cells.apply(&edit, SurfaceIndex::A, SurfaceIndex::B);
        let painted = cells.surface(SurfaceIndex::B);
        assert_eq!(painted.alive_count(), 1);
        assert!(painted.is_alive(2, 6));
    }

    #[test]
    fn test_resize_round_trip_keeps_retained_region() {
        let big = GridSize::square(64);
        let small = GridSize::square(32);
        let mut cells = CpuCells::new(big);
        let seed = Operation::Seed {
            seed: 0.5,
            alive_ratio: 0.15,
        };
        cells.apply(&seed, SurfaceIndex::B, SurfaceIndex::A);
        let before = cells.surface(SurfaceIndex::A).clone();

        cells.resize(small);
        cells.resize(big);
        let after = cells.surface(SurfaceIndex::A);

        for y in 0..big.height {
            for x in 0..big.width {
                let expected = if x < small.width && y < small.height {
                    before.get(x, y)
                } else {
                    CellGrid::DEAD
                };
                assert_eq!(after.get(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_writes_without_reading_accept_any_target() {
        let size = GridSize::square(9);
        let mut cells = CpuCells::new(size);
        cells.apply(&Operation::Load(blinker(size)), SurfaceIndex::B, SurfaceIndex::B);
        assert_eq!(cells.surface(SurfaceIndex::B), &blinker(size));
        cells.apply(&Operation::Clear, SurfaceIndex::B, SurfaceIndex::B);
        assert_eq!(cells.surface(SurfaceIndex::B).alive_count(), 0);
        assert!(!Operation::Clear.reads_source());
        assert!(Operation::Step.reads_source());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "step pass reads and writes")]
    fn test_step_into_its_own_source_is_rejected() {
        let mut cells = CpuCells::new(GridSize::square(4));
        cells.apply(&Operation::Step, SurfaceIndex::A, SurfaceIndex::A);
    }
}
