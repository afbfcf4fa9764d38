//! wgpu device and display surface
//!
//! Owns the window surface and the present pass. The cell surfaces and the
//! seed/step/edit programs live in [`GpuCells`], created through
//! [`RenderEngine::create_cells`] so both share one device.

use log::{debug, info, warn};
use std::sync::Arc;
use wgpu::{Device, Queue, TextureFormat};

use super::gpu_cells::GpuCells;
use super::presenter::Presenter;
use super::programs::ProgramSet;
use super::surfaces::CELL_FORMAT;
use crate::config::GridSize;
use crate::error::GfxError;
use crate::simulation::driver::Frame;
use crate::simulation::state::SimulationState;
use crate::view::Viewport;

async fn request_device(adapter: &wgpu::Adapter) -> Result<(Device, Queue), GfxError> {
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Cell Device"),
            required_features: wgpu::Features::default(),
            // The display surface may exceed the grid cap, so ask for the
            // adapter's full texture size.
            required_limits: wgpu::Limits {
                max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                ..wgpu::Limits::downlevel_defaults()
            },
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await?;
    Ok((device, queue))
}

/// Device and queue without a window, for offscreen use.
pub async fn headless_device() -> Result<(Arc<Device>, Arc<Queue>), GfxError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    let (device, queue) = request_device(&adapter).await?;
    Ok((Arc::new(device), Arc::new(queue)))
}

/// Surface extent accepted by a device whose textures are at most
/// `max_dimension` on a side. Zero sizes are raised to one.
pub fn clamp_surface_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    (width.clamp(1, max_dimension), height.clamp(1, max_dimension))
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    presenter: Presenter,
}

impl RenderEngine {
    /// Opens a device that can present to `window`.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, GfxError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = request_device(&adapter).await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(GfxError::NoSurfaceFormat)?;

        let (width, height) =
            clamp_surface_size(width, height, device.limits().max_texture_dimension_2d);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let presenter = Presenter::new(&device);
        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            format,
            presenter,
        })
    }

    /// Builds the four programs and the two cell surfaces.
    pub fn create_cells(&self, size: GridSize) -> Result<GpuCells, GfxError> {
        let programs = ProgramSet::new(&self.device, CELL_FORMAT, self.format)?;
        Ok(GpuCells::new(self.device.clone(), self.queue.clone(), programs, size))
    }

    /// Presents `frame` and lets `ui_callback` draw on top before submitting.
    pub fn render_frame<F>(&mut self, cells: &GpuCells, sim: &SimulationState, frame: Frame, ui_callback: F)
    where
        F: FnOnce(&Device, &Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(error) => {
                warn!("Skipping frame: {}", error);
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let viewport = self.viewport();
        self.presenter
            .render(cells, &mut encoder, &view, sim, viewport, frame);
        ui_callback(&self.device, &self.queue, &mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (width, height) = clamp_surface_size(width, height, self.max_texture_dimension());
        if (width, height) != (self.config.width, self.config.height) {
            debug!("Display surface {}x{}", width, height);
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    /// Largest texture side the device accepts. Grids are capped lower by
    /// [`crate::config::SimulationConfig::with_max_dimension`].
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_is_clamped_to_device_limit() {
        assert_eq!(clamp_surface_size(5120, 2880, 4096), (4096, 2880));
        assert_eq!(clamp_surface_size(6016, 3384, 16384), (6016, 3384));
        assert_eq!(clamp_surface_size(0, 0, 8192), (1, 1));
    }
}
