//! Classic starting patterns

use super::grid::CellGrid;
use crate::config::GridSize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pattern {
    Glider,
    Blinker,
    GosperGun,
}

const GLIDER: &[(u32, u32)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

const BLINKER: &[(u32, u32)] = &[(1, 0), (1, 1), (1, 2)];

const GOSPER_GUN: &[(u32, u32)] = &[
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Glider, Pattern::Blinker, Pattern::GosperGun];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Glider => "Glider",
            Pattern::Blinker => "Blinker",
            Pattern::GosperGun => "Gosper Gun",
        }
    }

    fn cells(&self) -> &'static [(u32, u32)] {
        match self {
            Pattern::Glider => GLIDER,
            Pattern::Blinker => BLINKER,
            Pattern::GosperGun => GOSPER_GUN,
        }
    }

    /// Bounding box of the pattern.
    pub fn extent(&self) -> GridSize {
        let (w, h) = self
            .cells()
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)));
        GridSize::new(w, h)
    }

    /// Blank grid of `size` with the pattern centred. Cells that fall outside
    /// a too-small grid are dropped.
    pub fn stamp(&self, size: GridSize) -> CellGrid {
        let mut grid = CellGrid::new(size);
        let extent = self.extent();
        let origin_x = size.width.saturating_sub(extent.width) / 2;
        let origin_y = size.height.saturating_sub(extent.height) / 2;

        for &(dx, dy) in self.cells() {
            let x = origin_x + dx;
            // Patterns are written top-down; row 0 of the grid is the bottom.
            let y = origin_y + (extent.height - 1 - dy);
            if x < size.width && y < size.height {
                grid.set(x, y, CellGrid::ALIVE);
            }
        }
        grid
    }
}
