//! cellglow
//!
//! Conway-style cellular automaton run entirely on the GPU: two state
//! textures ping-pong between seed, step and edit programs, and a present
//! program blends the last two generations with pan and zoom.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod simulation;
pub mod ui;
pub mod view;
pub mod wgpu_utils;

pub use app::CellApp;
pub use config::{GridSize, SimulationConfig, ViewConfig};
pub use error::{GfxError, ProgramError};
