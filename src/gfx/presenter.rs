//! Present pass: draws the blended generations onto the display target

use log::trace;
use wgpu::*;

use super::gpu_cells::GpuCells;
use super::programs::ProgramKind;
use crate::simulation::driver::Frame;
use crate::simulation::state::SimulationState;
use crate::simulation::traits::SurfaceIndex;
use crate::view::{PresentUniforms, Viewport};
use crate::wgpu_utils::UniformBuffer;

/// Present bind groups for one surface revision, indexed by the current surface
struct CachedBindGroups {
    revision: u64,
    by_current: [BindGroup; 2],
}

pub struct Presenter {
    uniforms: UniformBuffer<PresentUniforms>,
    cache: Option<CachedBindGroups>,
}

impl Presenter {
    pub fn new(device: &Device) -> Self {
        Self {
            uniforms: UniformBuffer::new(device),
            cache: None,
        }
    }

    fn bind_groups(&mut self, cells: &GpuCells) -> &[BindGroup; 2] {
        let revision = cells.surfaces().revision();
        if self.cache.as_ref().is_some_and(|cache| cache.revision != revision) {
            self.cache = None;
        }

        let uniforms = &self.uniforms;
        let cache = self.cache.get_or_insert_with(|| {
            let device = cells.device();
            let layout = cells.programs().get(ProgramKind::Present).bind_group_layout();
            let create = |current: SurfaceIndex| {
                device.create_bind_group(&BindGroupDescriptor {
                    label: Some(&format!("Present Bind Group {:?}", current)),
                    layout,
                    entries: &[
                        BindGroupEntry {
                            binding: 0,
                            resource: uniforms.binding_resource(),
                        },
                        BindGroupEntry {
                            binding: 1,
                            resource: BindingResource::TextureView(
                                cells.surfaces().get(current.other()).view(),
                            ),
                        },
                        BindGroupEntry {
                            binding: 2,
                            resource: BindingResource::TextureView(cells.surfaces().get(current).view()),
                        },
                    ],
                })
            };
            trace!("Present bind groups rebuilt for surface revision {}", revision);
            CachedBindGroups {
                revision,
                by_current: [create(SurfaceIndex::A), create(SurfaceIndex::B)],
            }
        });
        &cache.by_current
    }

    /// Records the present pass into `encoder`, drawing onto `target`.
    pub fn render(
        &mut self,
        cells: &GpuCells,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        sim: &SimulationState,
        viewport: Viewport,
        frame: Frame,
    ) {
        self.uniforms
            .update_content(cells.queue(), PresentUniforms::new(sim, viewport, frame.fraction));
        let bind_group = &self.bind_groups(cells)[frame.current.index()];

        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Present Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: target,
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
        pass.set_pipeline(cells.programs().get(ProgramKind::Present).pipeline());
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..4, 0..1);
    }
}
