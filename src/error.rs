//! Error types
//!
//! Only startup can fail: program compilation/linking and GPU device
//! acquisition. Simulation operations are infallible once the programs exist.

use thiserror::Error;

use crate::gfx::programs::{ProgramKind, ShaderStage};

/// Failure while building one of the four GPU programs
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to compile the {stage} stage of the {program} program: {message}")]
    Compile {
        program: ProgramKind,
        stage: ShaderStage,
        message: String,
    },

    #[error("failed to link the {program} program: {message}")]
    Link { program: ProgramKind, message: String },
}

impl ProgramError {
    pub fn program(&self) -> ProgramKind {
        match self {
            ProgramError::Compile { program, .. } | ProgramError::Link { program, .. } => *program,
        }
    }
}

/// Errors raised while bringing up or talking to the GPU
#[derive(Debug, Error)]
pub enum GfxError {
    #[error("failed to create a rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error("failed to read cells back from the GPU: {0}")]
    Readback(String),
}
