//! wgpu implementation of [`CellBackend`]

use bytemuck::{Pod, Zeroable};
use log::debug;
use std::sync::Arc;
use wgpu::*;

use super::programs::{ProgramKind, ProgramSet};
use super::surfaces::DualSurfaces;
use crate::config::GridSize;
use crate::error::GfxError;
use crate::simulation::grid::CellGrid;
use crate::simulation::traits::{CellBackend, Operation, SurfaceIndex};
use crate::wgpu_utils::UniformBuffer;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SeedUniforms {
    pub resolution: [f32; 2],
    pub seed: f32,
    pub alive_ratio: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct EditUniforms {
    pub cursor: [u32; 2],
    pub paint: u32,
    pub _padding: u32,
}

/// Bind groups that depend on the surface textures, indexed by source surface
struct SourceBindings {
    step: [BindGroup; 2],
    edit: [BindGroup; 2],
}

/// State surfaces on the GPU, driven by the seed, step and edit programs
pub struct GpuCells {
    device: Arc<Device>,
    queue: Arc<Queue>,
    programs: ProgramSet,
    surfaces: DualSurfaces,
    seed_uniforms: UniformBuffer<SeedUniforms>,
    edit_uniforms: UniformBuffer<EditUniforms>,
    seed_bind_group: BindGroup,
    source_bindings: SourceBindings,
}

impl GpuCells {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, programs: ProgramSet, size: GridSize) -> Self {
        let surfaces = DualSurfaces::new(device.clone(), queue.clone(), size);
        let seed_uniforms = UniformBuffer::new(&device);
        let edit_uniforms = UniformBuffer::new(&device);

        let seed_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Seed Bind Group"),
            layout: programs.get(ProgramKind::Seed).bind_group_layout(),
            entries: &[BindGroupEntry {
                binding: 0,
                resource: seed_uniforms.binding_resource(),
            }],
        });
        let source_bindings = Self::create_source_bindings(&device, &programs, &surfaces, &edit_uniforms);

        Self {
            device,
            queue,
            programs,
            surfaces,
            seed_uniforms,
            edit_uniforms,
            seed_bind_group,
            source_bindings,
        }
    }

    fn create_source_bindings(
        device: &Device,
        programs: &ProgramSet,
        surfaces: &DualSurfaces,
        edit_uniforms: &UniformBuffer<EditUniforms>,
    ) -> SourceBindings {
        let step = |source: SurfaceIndex| {
            device.create_bind_group(&BindGroupDescriptor {
                label: Some(&format!("Step Bind Group {:?}", source)),
                layout: programs.get(ProgramKind::Step).bind_group_layout(),
                entries: &[BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(surfaces.get(source).view()),
                }],
            })
        };
        let edit = |source: SurfaceIndex| {
            device.create_bind_group(&BindGroupDescriptor {
                label: Some(&format!("Edit Bind Group {:?}", source)),
                layout: programs.get(ProgramKind::Edit).bind_group_layout(),
                entries: &[
                    BindGroupEntry {
                        binding: 0,
                        resource: edit_uniforms.binding_resource(),
                    },
                    BindGroupEntry {
                        binding: 1,
                        resource: BindingResource::TextureView(surfaces.get(source).view()),
                    },
                ],
            })
        };
        SourceBindings {
            step: [step(SurfaceIndex::A), step(SurfaceIndex::B)],
            edit: [edit(SurfaceIndex::A), edit(SurfaceIndex::B)],
        }
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }

    pub fn programs(&self) -> &ProgramSet {
        &self.programs
    }

    pub fn surfaces(&self) -> &DualSurfaces {
        &self.surfaces
    }

    /// Records one full-target draw of `kind` into surface `target`.
    fn draw(&self, kind: ProgramKind, bind_group: &BindGroup, target: SurfaceIndex) {
        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some(&format!("{} Encoder", kind)),
        });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some(&format!("{} Pass", kind)),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: self.surfaces.get(target).view(),
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(self.programs.get(kind).pipeline());
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..4, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn clear(&self, target: SurfaceIndex) {
        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Clear Encoder"),
        });
        encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: self.surfaces.get(target).view(),
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color::BLACK),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.queue.submit(Some(encoder.finish()));
    }
}

impl CellBackend for GpuCells {
    fn size(&self) -> GridSize {
        self.surfaces.size()
    }

    fn apply(&mut self, operation: &Operation, source: SurfaceIndex, target: SurfaceIndex) {
        debug_assert!(
            !operation.reads_source() || source != target,
            "{} pass reads and writes {:?}",
            operation.name(),
            target
        );
        match operation {
            Operation::Idle => {}
            Operation::Step => {
                self.draw(ProgramKind::Step, &self.source_bindings.step[source.index()], target);
            }
            Operation::Edit { cursor, paint } => {
                self.edit_uniforms.update_content(
                    &self.queue,
                    EditUniforms {
                        cursor: [cursor.x, cursor.y],
                        paint: paint.code(),
                        _padding: 0,
                    },
                );
                self.draw(ProgramKind::Edit, &self.source_bindings.edit[source.index()], target);
            }
            Operation::Seed { seed, alive_ratio } => {
                let size = self.surfaces.size();
                self.seed_uniforms.update_content(
                    &self.queue,
                    SeedUniforms {
                        resolution: [size.width as f32, size.height as f32],
                        seed: *seed,
                        alive_ratio: *alive_ratio,
                    },
                );
                self.draw(ProgramKind::Seed, &self.seed_bind_group, target);
            }
            Operation::Load(grid) => self.surfaces.upload(target, grid),
            Operation::Clear => self.clear(target),
        }
    }

    fn resize(&mut self, size: GridSize) {
        self.surfaces.resize(size);
        self.source_bindings =
            Self::create_source_bindings(&self.device, &self.programs, &self.surfaces, &self.edit_uniforms);
        debug!("Rebuilt cell bind groups for {}", size);
    }

    fn read_back(&self, index: SurfaceIndex) -> Result<CellGrid, GfxError> {
        self.surfaces.read_back(index)
    }
}
