//! Window, event loop and per-frame wiring
//!
//! Every display refresh: apply queued panel actions, tick the driver, present
//! the frame with the control panel on top.

use anyhow::Context as _;
use cgmath::Vector2;
use log::{error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes},
};

use crate::config::{SimulationConfig, ViewConfig};
use crate::gfx::{GpuCells, RenderEngine};
use crate::performance::PerformanceMonitor;
use crate::simulation::{SimulationDriver, SimulationState};
use crate::ui::{control_panel, PanelAction, PanelStatus, UiManager};
use crate::view::{InteractionMapper, Modifiers, PointerButton};

pub struct CellApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    driver: Option<SimulationDriver<GpuCells>>,
    ui_manager: Option<UiManager>,
    sim: SimulationState,
    mapper: InteractionMapper,
    modifiers: Modifiers,
    performance: PerformanceMonitor,
    started: Instant,
    pending_actions: Vec<PanelAction>,
    startup_error: Option<anyhow::Error>,
}

impl CellApp {
    pub fn new(config: SimulationConfig, view_config: ViewConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        Ok(Self {
            event_loop,
            app_state: AppState {
                window: None,
                render_engine: None,
                driver: None,
                ui_manager: None,
                sim: SimulationState::new(config, view_config),
                mapper: InteractionMapper::new(),
                modifiers: Modifiers::default(),
                performance: PerformanceMonitor::new(),
                started: Instant::now(),
                pending_actions: Vec::new(),
                startup_error: None,
            },
        })
    }

    /// Runs until the window closes. Startup failures (no adapter, a program
    /// that does not compile) are returned.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;
        match self.app_state.startup_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Keyboard shortcut for `code`, if it maps to a panel action.
pub fn key_action(code: KeyCode) -> Option<PanelAction> {
    match code {
        KeyCode::Space => Some(PanelAction::TogglePause),
        KeyCode::KeyN => Some(PanelAction::StepOnce),
        KeyCode::KeyR => Some(PanelAction::Randomize),
        KeyCode::KeyC => Some(PanelAction::Clear),
        KeyCode::Digit0 => Some(PanelAction::ResetView),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}

/// Wheel delta in the web convention (positive towards the user).
fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("cellglow")
                    .with_inner_size(winit::dpi::LogicalSize::new(1000, 1000)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);
        let (width, height) = window.inner_size().into();

        let render_engine = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;

        self.sim.config = self
            .sim
            .config
            .clone()
            .with_max_dimension(render_engine.max_texture_dimension());
        self.sim.clamp_view();
        info!(
            "Largest grid side {} (grid exponent up to {})",
            self.sim.config.max_dimension(),
            self.sim.config.max_grid_exponent()
        );

        let cells = render_engine.create_cells(self.sim.grid())?;
        let mut driver = SimulationDriver::new(cells);
        let seed = driver.randomize(&mut self.sim, &mut rand::rng());
        self.sim.last_step = self.started.elapsed();
        info!("Started {} grid with seed {:.3}", self.sim.grid(), seed);

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        self.ui_manager = Some(ui_manager);
        self.driver = Some(driver);
        self.render_engine = Some(render_engine);
        self.window = Some(window);
        Ok(())
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn apply_action(&mut self, action: PanelAction) {
        let now = self.now();
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        match action {
            PanelAction::ResizeGrid(size) => self.sim.request_resize(size),
            PanelAction::SetGenerationLifetime(lifetime) => {
                self.sim.config.set_generation_lifetime(lifetime)
            }
            PanelAction::TogglePause => {
                let paused = !self.sim.is_paused();
                self.sim.set_paused(paused);
                info!("{}", if paused { "Paused" } else { "Resumed" });
            }
            PanelAction::StepOnce => driver.step_once(&mut self.sim, now),
            PanelAction::Randomize => {
                driver.randomize(&mut self.sim, &mut rand::rng());
            }
            PanelAction::Clear => driver.clear(&mut self.sim),
            PanelAction::LoadPattern(pattern) => driver.load_pattern(&mut self.sim, pattern),
            PanelAction::ResetView => self.mapper.reset_view(&mut self.sim),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::F11 => {
                if let Some(window) = self.window.as_ref() {
                    let fullscreen = match window.fullscreen() {
                        Some(_) => None,
                        None => Some(Fullscreen::Borderless(None)),
                    };
                    window.set_fullscreen(fullscreen);
                }
            }
            code => {
                if let Some(action) = key_action(code) {
                    self.apply_action(action);
                }
            }
        }
    }

    fn redraw(&mut self) {
        let actions = std::mem::take(&mut self.pending_actions);
        for action in actions {
            self.apply_action(action);
        }

        self.performance.begin_frame();
        let now = self.now();
        let (Some(window), Some(render_engine), Some(driver)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.driver.as_mut(),
        ) else {
            return;
        };

        let frame = driver.tick(&mut self.sim, now).frame;

        let status = PanelStatus::new(&self.sim, self.performance.metrics());
        let ui_manager = &mut self.ui_manager;
        let pending_actions = &mut self.pending_actions;
        render_engine.render_frame(driver.backend(), &self.sim, frame, |device, queue, encoder, view| {
            if let Some(ui_manager) = ui_manager.as_mut() {
                ui_manager.draw(window, device, queue, encoder, view, |ui| {
                    pending_actions.extend(control_panel(ui, &status));
                });
            }
        });
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.initialize(event_loop) {
            error!("Startup failed: {:#}", error);
            self.startup_error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.captures(&window, window_id, &event) {
                return;
            }
        }

        let viewport = match self.render_engine.as_ref() {
            Some(render_engine) => render_engine.viewport(),
            None => return,
        };

        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vector2::new(position.x as f32, position.y as f32);
                self.mapper.pointer_moved(&mut self.sim, position, viewport);
            }
            WindowEvent::CursorLeft { .. } => self.mapper.pointer_left(&mut self.sim),
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.mapper
                        .pointer_down(&mut self.sim, pointer_button(button), self.modifiers)
                }
                ElementState::Released => self.mapper.pointer_up(&mut self.sim),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.mapper.wheel(&mut self.sim, wheel_delta(delta));
            }
            WindowEvent::Touch(touch) => {
                let position = Vector2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => self.mapper.touch_start(&mut self.sim, position, viewport),
                    TouchPhase::Moved => self.mapper.touch_moved(&mut self.sim, position, viewport),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.mapper.touch_end(&mut self.sim),
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
