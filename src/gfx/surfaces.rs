//! Double-buffered cell state textures

use futures::channel::oneshot;
use log::debug;
use std::sync::Arc;
use wgpu::*;

use crate::config::GridSize;
use crate::error::GfxError;
use crate::simulation::grid::CellGrid;
use crate::simulation::traits::SurfaceIndex;
use crate::wgpu_utils::padded_bytes_per_row;

/// Texel format of the state surfaces. Only the red channel is read.
pub const CELL_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

const BYTES_PER_TEXEL: u32 = 4;

/// One state surface, usable both as render target and as program input
pub struct CellSurface {
    texture: Texture,
    view: TextureView,
}

impl CellSurface {
    /// New surface with every cell dead.
    pub fn new(device: &Device, size: GridSize, label: &str) -> Self {
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: CELL_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT
                | TextureUsages::TEXTURE_BINDING
                | TextureUsages::COPY_SRC
                | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }
}

fn extent(size: GridSize) -> Extent3d {
    Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

fn texel_copy(texture: &Texture) -> TexelCopyTextureInfo {
    TexelCopyTextureInfo {
        texture,
        mip_level: 0,
        origin: Origin3d::ZERO,
        aspect: TextureAspect::All,
    }
}

/// The two state surfaces and their shared size
pub struct DualSurfaces {
    device: Arc<Device>,
    queue: Arc<Queue>,
    surfaces: [CellSurface; 2],
    size: GridSize,
    /// Bumped whenever the textures are replaced, so cached bind groups can
    /// tell they are stale.
    revision: u64,
}

impl DualSurfaces {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, size: GridSize) -> Self {
        let surfaces = Self::create_pair(&device, size);
        Self {
            device,
            queue,
            surfaces,
            size,
            revision: 0,
        }
    }

    fn create_pair(device: &Device, size: GridSize) -> [CellSurface; 2] {
        [
            CellSurface::new(device, size, "Cell Surface A"),
            CellSurface::new(device, size, "Cell Surface B"),
        ]
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, index: SurfaceIndex) -> &CellSurface {
        &self.surfaces[index.index()]
    }

    /// Replaces both surfaces with `size` ones, carrying over the overlapping
    /// region. Cells outside the overlap start dead.
    pub fn resize(&mut self, size: GridSize) {
        if size == self.size {
            return;
        }
        let replacement = Self::create_pair(&self.device, size);
        let overlap = self.size.overlap(size);

        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Cell Resize Encoder"),
        });
        for (old, new) in self.surfaces.iter().zip(replacement.iter()) {
            encoder.copy_texture_to_texture(
                texel_copy(old.texture()),
                texel_copy(new.texture()),
                extent(overlap),
            );
        }
        self.queue.submit(Some(encoder.finish()));

        debug!("Cell surfaces {} -> {} (kept {})", self.size, size, overlap);
        self.surfaces = replacement;
        self.size = size;
        self.revision += 1;
    }

    /// Writes `grid` into surface `index`. The grid is cropped or padded with
    /// dead cells to the surface size.
    pub fn upload(&self, index: SurfaceIndex, grid: &CellGrid) {
        let grid = if grid.size() == self.size {
            grid.to_rgba8()
        } else {
            grid.cropped(self.size).to_rgba8()
        };
        self.queue.write_texture(
            texel_copy(self.get(index).texture()),
            &grid,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.size.width * BYTES_PER_TEXEL),
                rows_per_image: Some(self.size.height),
            },
            extent(self.size),
        );
    }

    /// Copies surface `index` back to the CPU. Blocks until the GPU is done.
    pub fn read_back(&self, index: SurfaceIndex) -> Result<CellGrid, GfxError> {
        let unpadded = self.size.width * BYTES_PER_TEXEL;
        let padded = padded_bytes_per_row(unpadded);
        let staging = self.device.create_buffer(&BufferDescriptor {
            label: Some("Cell Readback Buffer"),
            size: padded as u64 * self.size.height as u64,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Cell Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            texel_copy(self.get(index).texture()),
            TexelCopyBufferInfo {
                buffer: &staging,
                layout: TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.size.height),
                },
            },
            extent(self.size),
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = oneshot::channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(PollType::Wait)
            .map_err(|error| GfxError::Readback(error.to_string()))?;
        pollster::block_on(receiver)
            .map_err(|error| GfxError::Readback(error.to_string()))?
            .map_err(|error| GfxError::Readback(error.to_string()))?;

        let texels = {
            let mapped = slice.get_mapped_range();
            mapped
                .chunks_exact(padded as usize)
                .flat_map(|row| row[..unpadded as usize].iter().copied())
                .collect::<Vec<u8>>()
        };
        staging.unmap();

        CellGrid::from_rgba8(self.size, &texels)
            .ok_or_else(|| GfxError::Readback(format!("short readback for {}", self.size)))
    }
}
