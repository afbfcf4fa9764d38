// src/simulation/mod.rs
//! Simulation system
//!
//! The automaton state machine and everything it needs that is not GPU
//! specific: the backend seam, the shared render-loop state, per-cell rules,
//! patterns and the CPU reference backend.

pub mod cpu;
pub mod driver;
pub mod grid;
pub mod patterns;
pub mod rules;
pub mod state;
pub mod traits;

pub use cpu::CpuCells;
pub use driver::{DriverState, Frame, SimulationDriver, TickReport};
pub use grid::{CellCoord, CellGrid};
pub use patterns::Pattern;
pub use state::{EditButton, GenerationPointer, InteractionState, SimulationState, ViewState};
pub use traits::{CellBackend, Operation, Paint, SurfaceIndex};
