//! Core simulation traits
//!
//! [`CellBackend`] is the seam between the simulation driver and whatever owns
//! the two state surfaces. The wgpu implementation lives in
//! [`crate::gfx::gpu_cells`]; [`super::cpu::CpuCells`] runs the same programs on
//! the CPU.

use super::grid::{CellCoord, CellGrid};
use crate::config::GridSize;
use crate::error::GfxError;

/// Role-free name of one of the two state surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceIndex {
    A,
    B,
}

impl SurfaceIndex {
    pub fn other(self) -> Self {
        match self {
            SurfaceIndex::A => SurfaceIndex::B,
            SurfaceIndex::B => SurfaceIndex::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SurfaceIndex::A => 0,
            SurfaceIndex::B => 1,
        }
    }
}

/// What the edit program writes under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Alive,
    Dead,
    Keep,
}

impl Paint {
    /// Encoding used by the edit program's uniform block.
    pub fn code(self) -> u32 {
        match self {
            Paint::Keep => 0,
            Paint::Alive => 1,
            Paint::Dead => 2,
        }
    }
}

/// One write of a program into a surface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Nothing is written.
    Idle,
    /// Advance one generation.
    Step,
    /// Copy the source, painting the cell under the cursor.
    Edit { cursor: CellCoord, paint: Paint },
    /// Pseudo-random fill from a seed value.
    Seed { seed: f32, alive_ratio: f32 },
    /// Upload a prepared grid, cropped to the surface size.
    Load(CellGrid),
    /// Every cell dead.
    Clear,
}

impl Operation {
    /// Whether applying this operation produces a new generation.
    pub fn writes(&self) -> bool {
        !matches!(self, Operation::Idle)
    }

    /// Whether the program samples the source surface. Such operations need
    /// a target distinct from their source.
    pub fn reads_source(&self) -> bool {
        matches!(self, Operation::Step | Operation::Edit { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Idle => "idle",
            Operation::Step => "step",
            Operation::Edit { .. } => "edit",
            Operation::Seed { .. } => "seed",
            Operation::Load(_) => "load",
            Operation::Clear => "clear",
        }
    }
}

/// Owner of the two equally sized state surfaces
pub trait CellBackend {
    /// Current dimensions shared by both surfaces.
    fn size(&self) -> GridSize;

    /// Runs `operation` reading `source` and writing `target`.
    ///
    /// `Idle` writes nothing. `source` and `target` must differ for operations
    /// that read.
    fn apply(&mut self, operation: &Operation, source: SurfaceIndex, target: SurfaceIndex);

    /// Replaces both surfaces with `size`, preserving the top-left overlap.
    fn resize(&mut self, size: GridSize);

    /// Copies one surface back into CPU memory.
    fn read_back(&self, index: SurfaceIndex) -> Result<CellGrid, GfxError>;
}
