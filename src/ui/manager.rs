//! ImGui integration
//!
//! Owns the ImGui context, the winit platform glue and the wgpu renderer for
//! the control panel overlay. One panel frame is built and drawn per
//! presented frame, inside the render engine's overlay callback.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    pub fn new(device: &Device, queue: &Queue, target_format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        // Locked DPI: the panel is laid out in physical pixels like the grid.
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: target_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards an input event to the panel. Returns true when the panel
    /// captures it, in which case the grid must not see it.
    pub fn captures(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        let wants_keyboard = match event {
            WindowEvent::KeyboardInput { .. } => true,
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. } => false,
            // Forwarded for imgui's own bookkeeping, never captured.
            WindowEvent::ModifiersChanged(_) | WindowEvent::Focused(_) => {
                self.forward(window, window_id, event);
                return false;
            }
            _ => return false,
        };

        self.forward(window, window_id, event);
        let io = self.context.io();
        if wants_keyboard {
            io.want_capture_keyboard
        } else {
            io.want_capture_mouse
        }
    }

    fn forward(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) {
        let event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform.handle_event(self.context.io_mut(), window, &event);
    }

    /// Builds one panel frame with `build` and draws it over `target`,
    /// keeping what is already there.
    pub fn draw<F>(
        &mut self,
        window: &Window,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        build: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("Failed to prepare UI frame: {}", error);
            return;
        }

        let ui = self.context.frame();
        build(ui);
        let cursor = ui.mouse_cursor();
        if self.last_cursor != cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        let [width, height] = draw_data.display_size;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Panel Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self.renderer.render(draw_data, queue, device, &mut pass) {
            warn!("Failed to render UI: {:?}", error);
        }
    }
}
