//! Simulation control panel
//!
//! The panel reads a [`PanelStatus`] snapshot and reports what the user asked
//! for as [`PanelAction`]s; the app applies them after the frame is drawn.

use std::time::Duration;

use crate::config::{
    GridSize, MAX_GENERATION_LIFETIME_MS, MIN_GENERATION_LIFETIME_MS, MIN_GRID_EXPONENT,
};
use crate::performance::PerformanceMetrics;
use crate::simulation::patterns::Pattern;
use crate::simulation::state::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    ResizeGrid(GridSize),
    SetGenerationLifetime(Duration),
    TogglePause,
    StepOnce,
    Randomize,
    Clear,
    LoadPattern(Pattern),
    ResetView,
}

/// Values the panel displays
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStatus {
    pub grid: GridSize,
    pub max_grid_exponent: u32,
    pub generation_lifetime: Duration,
    pub paused: bool,
    pub generation: u64,
    pub scale: f32,
    pub fps: f32,
}

impl PanelStatus {
    pub fn new(sim: &SimulationState, metrics: &PerformanceMetrics) -> Self {
        Self {
            grid: sim.grid(),
            max_grid_exponent: sim.config.max_grid_exponent(),
            generation_lifetime: sim.config.generation_lifetime(),
            paused: sim.is_paused(),
            generation: sim.generation_count,
            scale: sim.view.scale,
            fps: metrics.fps,
        }
    }
}

pub fn control_panel(ui: &imgui::Ui, status: &PanelStatus) -> Vec<PanelAction> {
    let mut actions = Vec::new();
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return actions;
    }

    ui.window("Cells")
        .size([320.0, 0.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .always_auto_resize(true)
        .build(|| {
            ui.text(format!("Grid {}  |  generation {}", status.grid, status.generation));
            ui.text(format!("FPS {:.0}  |  zoom {:.0}%", status.fps, 100.0 / status.scale));
            ui.separator();

            let mut exponent = status.grid.width_log2();
            if ui.slider("Grid size (2^n)", MIN_GRID_EXPONENT, status.max_grid_exponent, &mut exponent) {
                actions.push(PanelAction::ResizeGrid(GridSize::from_log2(exponent)));
            }

            let mut lifetime_ms = status.generation_lifetime.as_millis() as u64;
            if ui.slider(
                "Generation (ms)",
                MIN_GENERATION_LIFETIME_MS,
                MAX_GENERATION_LIFETIME_MS,
                &mut lifetime_ms,
            ) {
                actions.push(PanelAction::SetGenerationLifetime(Duration::from_millis(lifetime_ms)));
            }
            ui.separator();

            let pause_label = if status.paused { "Resume" } else { "Pause" };
            if ui.button(pause_label) {
                actions.push(PanelAction::TogglePause);
            }
            ui.same_line();
            if ui.button("Step") {
                actions.push(PanelAction::StepOnce);
            }
            ui.same_line();
            if ui.button("Random") {
                actions.push(PanelAction::Randomize);
            }
            ui.same_line();
            if ui.button("Clear") {
                actions.push(PanelAction::Clear);
            }

            for pattern in Pattern::ALL {
                if ui.button(pattern.as_str()) {
                    actions.push(PanelAction::LoadPattern(pattern));
                }
                ui.same_line();
            }
            if ui.button("Reset view") {
                actions.push(PanelAction::ResetView);
            }

            ui.separator();
            ui.text_disabled("Left paint  Right erase  Ctrl-drag pan  Wheel zoom");
            ui.text_disabled("Space pause  N step  R random  C clear  F11 fullscreen");
        });

    actions
}
