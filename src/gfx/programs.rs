//! GPU program compilation
//!
//! A program is the shared full-target vertex stage linked with one of the
//! four fragment stages into a render pipeline. Compilation and linking run
//! inside validation error scopes so a bad shader is reported as a
//! [`ProgramError`] at startup instead of a panic on first use.

use log::{debug, info};
use std::fmt;
use wgpu::*;

use super::shaders;
use crate::error::ProgramError;
use crate::wgpu_utils::binding_types;

/// The four cell programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Seed,
    Step,
    Edit,
    Present,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 4] = [
        ProgramKind::Seed,
        ProgramKind::Step,
        ProgramKind::Edit,
        ProgramKind::Present,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramKind::Seed => "seed",
            ProgramKind::Step => "step",
            ProgramKind::Edit => "edit",
            ProgramKind::Present => "present",
        }
    }

    pub fn fragment_source(&self) -> &'static str {
        match self {
            ProgramKind::Seed => shaders::SEED,
            ProgramKind::Step => shaders::STEP,
            ProgramKind::Edit => shaders::EDIT,
            ProgramKind::Present => shaders::PRESENT,
        }
    }

    /// Binding layout of group 0.
    fn layout_entries(&self) -> Vec<BindGroupLayoutEntry> {
        let entry = |binding, ty| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStages::FRAGMENT,
            ty,
            count: None,
        };
        match self {
            ProgramKind::Seed => vec![entry(0, binding_types::uniform())],
            ProgramKind::Step => vec![entry(0, binding_types::texture_2d())],
            ProgramKind::Edit => vec![
                entry(0, binding_types::uniform()),
                entry(1, binding_types::texture_2d()),
            ],
            ProgramKind::Present => vec![
                entry(0, binding_types::uniform()),
                entry(1, binding_types::texture_2d()),
                entry(2, binding_types::texture_2d()),
            ],
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A linked program and the layout its bind groups must follow
pub struct Program {
    kind: ProgramKind,
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
}

impl Program {
    /// Compiles both stages and links them for a `target_format` attachment.
    pub fn build(
        device: &Device,
        kind: ProgramKind,
        vertex_source: &str,
        fragment_source: &str,
        target_format: TextureFormat,
    ) -> Result<Self, ProgramError> {
        let vertex = compile(device, kind, ShaderStage::Vertex, vertex_source)?;
        let fragment = compile(device, kind, ShaderStage::Fragment, fragment_source)?;

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(&format!("{} Bind Group Layout", kind)),
            entries: &kind.layout_entries(),
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", kind)),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&format!("{} Program", kind)),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: target_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ProgramError::Link {
                program: kind,
                message: error.to_string(),
            });
        }

        debug!("Linked {} program for {:?}", kind, target_format);
        Ok(Self {
            kind,
            pipeline,
            bind_group_layout,
        })
    }

    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }
}

fn compile(
    device: &Device,
    program: ProgramKind,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderModule, ProgramError> {
    device.push_error_scope(ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(&format!("{} {} Shader", program, stage)),
        source: ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ProgramError::Compile {
            program,
            stage,
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// All four programs, built once at startup
pub struct ProgramSet {
    seed: Program,
    step: Program,
    edit: Program,
    present: Program,
}

impl ProgramSet {
    /// `cell_format` is the format of the state surfaces; `present_format`
    /// the format of the display target.
    pub fn new(
        device: &Device,
        cell_format: TextureFormat,
        present_format: TextureFormat,
    ) -> Result<Self, ProgramError> {
        let build = |kind: ProgramKind, format| {
            Program::build(device, kind, shaders::VERTEX, kind.fragment_source(), format)
        };
        let programs = Self {
            seed: build(ProgramKind::Seed, cell_format)?,
            step: build(ProgramKind::Step, cell_format)?,
            edit: build(ProgramKind::Edit, cell_format)?,
            present: build(ProgramKind::Present, present_format)?,
        };
        info!("Built {} GPU programs", ProgramKind::ALL.len());
        Ok(programs)
    }

    pub fn get(&self, kind: ProgramKind) -> &Program {
        match kind {
            ProgramKind::Seed => &self.seed,
            ProgramKind::Step => &self.step,
            ProgramKind::Edit => &self.edit,
            ProgramKind::Present => &self.present,
        }
    }
}
