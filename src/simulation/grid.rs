//! CPU-side cell grids
//!
//! A [`CellGrid`] mirrors the red channel of one surface: row-major, row 0 is
//! texture row 0 (the bottom of the screen), values in `[0, 1]`.

use crate::config::GridSize;

/// Integer cell position inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    size: GridSize,
    cells: Vec<f32>,
}

impl CellGrid {
    pub const ALIVE: f32 = 1.0;
    pub const DEAD: f32 = 0.0;

    /// All-dead grid.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Self::DEAD; size.cell_count()],
        }
    }

    /// Wraps raw row-major values. Returns `None` on a length mismatch.
    pub fn from_cells(size: GridSize, cells: Vec<f32>) -> Option<Self> {
        (cells.len() == size.cell_count()).then_some(Self { size, cells })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let index = self.index(x, y);
        self.cells[index] = value;
    }

    pub fn is_alive(&self, x: u32, y: u32) -> bool {
        self.get(x, y) >= 0.5
    }

    /// Reads with toroidal wraparound on both axes.
    pub fn get_wrapped(&self, x: i64, y: i64) -> f32 {
        let w = self.size.width as i64;
        let h = self.size.height as i64;
        self.get(x.rem_euclid(w) as u32, y.rem_euclid(h) as u32)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value >= 0.5).count()
    }

    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    /// Copy of this grid at `size`, keeping the top-left overlap and leaving
    /// the newly exposed cells dead.
    pub fn cropped(&self, size: GridSize) -> CellGrid {
        let mut resized = CellGrid::new(size);
        let overlap = self.size.overlap(size);
        for y in 0..overlap.height {
            for x in 0..overlap.width {
                resized.set(x, y, self.get(x, y));
            }
        }
        resized
    }

    /// Row-major RGBA8 texels as stored on the GPU.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.cells
            .iter()
            .flat_map(|&value| {
                let v = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                [v, v, v, 255]
            })
            .collect()
    }

    /// Rebuilds a grid from tightly packed RGBA8 texels (red channel only).
    pub fn from_rgba8(size: GridSize, texels: &[u8]) -> Option<Self> {
        let cells = texels
            .chunks_exact(4)
            .map(|texel| texel[0] as f32 / 255.0)
            .collect();
        Self::from_cells(size, cells)
    }
}
