//! GPU side: programs, state surfaces and presentation
//!
//! - [`programs`] compiles the four cell programs
//! - [`surfaces`] owns the two state textures
//! - [`gpu_cells`] runs seed/step/edit passes behind [`crate::simulation::CellBackend`]
//! - [`presenter`] draws the blended generations to the display
//! - [`render_engine`] owns the device and the window surface

pub mod gpu_cells;
pub mod presenter;
pub mod programs;
pub mod render_engine;
pub mod shaders;
pub mod surfaces;

pub use gpu_cells::GpuCells;
pub use programs::{Program, ProgramKind, ProgramSet, ShaderStage};
pub use render_engine::{headless_device, RenderEngine};
pub use surfaces::{CellSurface, DualSurfaces, CELL_FORMAT};
