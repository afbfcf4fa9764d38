//! Per-cell semantics of the seed, step and edit programs
//!
//! These functions are the CPU statement of what the WGSL fragment programs in
//! [`crate::gfx::shaders`] compute for one pixel. The CPU backend is built from
//! them, and the GPU integration test checks the shaders against them.

use super::grid::{CellCoord, CellGrid};
use super::traits::Paint;
use crate::config::GridSize;

/// Sum of the 3×3 block centred on `(x, y)`, the cell itself included, with
/// toroidal wraparound.
pub fn neighborhood_sum(grid: &CellGrid, x: u32, y: u32) -> f32 {
    let mut sum = 0.0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            sum += grid.get_wrapped(x as i64 + dx, y as i64 + dy);
        }
    }
    sum
}

/// Next state for a cell: alive on a sum of 3, unchanged on 4, dead otherwise.
pub fn step_cell(current: f32, sum: f32) -> f32 {
    match sum.round() as i32 {
        3 => CellGrid::ALIVE,
        4 => current,
        _ => CellGrid::DEAD,
    }
}

fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Hash of a normalized pixel position, in `[0, 1)`.
pub fn seed_hash(st: [f32; 2], seed: f32) -> f32 {
    let mut x = fract(st[0] * 123.45);
    let mut y = fract(st[1] * 456.78);
    let d = x * (x + seed * 42.0) + y * (y + seed * 42.0);
    x += d;
    y += d;
    fract(x * y)
}

/// State written by the seed program at `(x, y)`.
pub fn seed_cell(x: u32, y: u32, size: GridSize, seed: f32, alive_ratio: f32) -> f32 {
    let st = [
        (x as f32 + 0.5) / size.width as f32,
        (y as f32 + 0.5) / size.height as f32,
    ];
    if seed_hash(st, seed) < alive_ratio {
        CellGrid::ALIVE
    } else {
        CellGrid::DEAD
    }
}

/// State written by the edit program at `here`.
pub fn edit_cell(current: f32, here: CellCoord, cursor: CellCoord, paint: Paint) -> f32 {
    if here != cursor {
        return current;
    }
    match paint {
        Paint::Alive => CellGrid::ALIVE,
        Paint::Dead => CellGrid::DEAD,
        Paint::Keep => current,
    }
}
