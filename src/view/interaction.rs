//! Pointer, touch and wheel handling
//!
//! Turns device-independent input into edits of [`SimulationState`]: the cell
//! under the pointer, the paint button, the pause flag and pan/zoom.

use cgmath::Vector2;
use log::debug;

use super::mapping::{self, Viewport};
use crate::simulation::grid::CellCoord;
use crate::simulation::state::{EditButton, SimulationState};

/// Mouse button as seen by the mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Stateless translator from input events to simulation state changes
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionMapper;

impl InteractionMapper {
    pub fn new() -> Self {
        Self
    }

    /// Grid cell under `position`, pinned to the grid border.
    pub fn cell_at(&self, sim: &SimulationState, position: Vector2<f32>, viewport: Viewport) -> CellCoord {
        let st = mapping::screen_to_simulation(position, viewport, &sim.view, &sim.view_config);
        mapping::clamped_cell_at(st, sim.grid())
    }

    /// Button press. Primary and secondary pause the simulation, middle and
    /// other buttons do not. With a modifier held the drag pans instead of
    /// painting.
    pub fn pointer_down(&self, sim: &mut SimulationState, button: PointerButton, modifiers: Modifiers) {
        let edit = if modifiers.any() {
            EditButton::Pan
        } else {
            match button {
                PointerButton::Primary => EditButton::PaintAlive,
                PointerButton::Secondary => EditButton::PaintDead,
                PointerButton::Middle => EditButton::Hold,
                PointerButton::Other => EditButton::None,
            }
        };
        sim.interaction.button = edit;
        if matches!(button, PointerButton::Primary | PointerButton::Secondary) {
            sim.set_paused(true);
        }
        debug!("Pointer {:?} down -> {:?}", button, edit);
    }

    /// Pointer motion in physical pixels.
    pub fn pointer_moved(&self, sim: &mut SimulationState, position: Vector2<f32>, viewport: Viewport) {
        if sim.interaction.button == EditButton::Pan {
            if let Some(last) = sim.interaction.pointer_position {
                self.pan(sim, last, position, viewport);
            }
        }
        sim.interaction.pointer_position = Some(position);
        sim.interaction.cursor = self.cell_at(sim, position, viewport);
    }

    pub fn pointer_up(&self, sim: &mut SimulationState) {
        sim.interaction.button = EditButton::None;
    }

    /// Pointer left the window; the last cursor cell is kept.
    pub fn pointer_left(&self, sim: &mut SimulationState) {
        sim.interaction.pointer_position = None;
    }

    /// Touch contact paints cells alive and pauses.
    pub fn touch_start(&self, sim: &mut SimulationState, position: Vector2<f32>, viewport: Viewport) {
        self.pointer_moved(sim, position, viewport);
        sim.interaction.button = EditButton::PaintAlive;
        sim.set_paused(true);
    }

    pub fn touch_moved(&self, sim: &mut SimulationState, position: Vector2<f32>, viewport: Viewport) {
        self.pointer_moved(sim, position, viewport);
    }

    pub fn touch_end(&self, sim: &mut SimulationState) {
        sim.interaction.button = EditButton::None;
    }

    /// Wheel step. `delta_y` follows the web convention: negative when the
    /// wheel turns away from the user, which multiplies the scale up.
    pub fn wheel(&self, sim: &mut SimulationState, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let config = sim.view_config;
        let factor = if delta_y < 0.0 {
            config.zoom_in_factor
        } else {
            config.zoom_out_factor
        };
        sim.view.scale = config.clamp_scale(sim.view.scale * factor, sim.grid().width);
        debug!("Zoom scale {:.4}", sim.view.scale);
    }

    /// Drags the view so the content under `from` ends up under `to`.
    pub fn pan(&self, sim: &mut SimulationState, from: Vector2<f32>, to: Vector2<f32>, viewport: Viewport) {
        let config = &sim.view_config;
        let before = mapping::screen_to_view(from, viewport, config);
        let after = mapping::screen_to_view(to, viewport, config);
        sim.view.offset -= after - before;
    }

    /// Back to the whole grid.
    pub fn reset_view(&self, sim: &mut SimulationState) {
        sim.view = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridSize, SimulationConfig, ViewConfig};
    use crate::simulation::grid::CellGrid;
    use crate::simulation::traits::Paint;
    use crate::view::compositor;

    fn sim(size: GridSize) -> SimulationState {
        SimulationState::new(SimulationConfig::default().with_grid(size), ViewConfig::default())
    }

    #[test]
    fn test_centre_pixel_maps_to_centre_cell() {
        let state = sim(GridSize::square(64));
        let mapper = InteractionMapper::new();
        let cell = mapper.cell_at(&state, Vector2::new(400.5, 399.5), Viewport::new(800, 800));
        assert_eq!(cell, CellCoord::new(32, 32));
    }

    #[test]
    fn test_screen_top_left_is_top_row() {
        let size = GridSize::square(16);
        let state = sim(size);
        let mapper = InteractionMapper::new();
        let cell = mapper.cell_at(&state, Vector2::new(0.0, 0.0), Viewport::new(320, 320));
        assert_eq!(cell, CellCoord::new(0, 15));
    }

    #[test]
    fn test_letterbox_clamps_to_border() {
        let size = GridSize::square(16);
        let state = sim(size);
        let mapper = InteractionMapper::new();
        let cell = mapper.cell_at(&state, Vector2::new(2.0, 200.0), Viewport::new(1200, 400));
        assert_eq!(cell.x, 0);
    }

    #[test]
    fn test_pointer_hits_the_cell_that_is_drawn() {
        let size = GridSize::square(8);
        let mut state = sim(size);
        state.view.scale = 0.5;
        state.view.offset = Vector2::new(0.3, 0.1);
        state.view_config.scrollbar_threshold = 0.0;
        let viewport = Viewport::new(300, 200);
        let mapper = InteractionMapper::new();
        let blank = CellGrid::new(size);

        for py in (0..200).step_by(7) {
            for px in (0..300).step_by(7) {
                let position = Vector2::new(px as f32 + 0.5, py as f32 + 0.5);
                let st = mapping::screen_to_simulation(position, viewport, &state.view, &state.view_config);
                if !mapping::inside_unit_square(st) {
                    continue;
                }
                // Every cell but the mapped one is alive, so the pixel is
                // dark only if it samples the mapped cell.
                let cell = mapper.cell_at(&state, position, viewport);
                let mut others = CellGrid::new(size);
                others.fill(CellGrid::ALIVE);
                others.set(cell.x, cell.y, CellGrid::DEAD);
                let shaded = compositor::shade(&state, viewport, 1.0, &blank, &others, position);
                assert_eq!(shaded, 0.0, "pixel ({px}, {py}) drew a neighbour of {cell:?}");
            }
        }
    }

    #[test]
    fn test_wheel_stays_within_zoom_bounds() {
        let size = GridSize::square(256);
        let mut state = sim(size);
        let mapper = InteractionMapper::new();
        for _ in 0..50 {
            mapper.wheel(&mut state, 1.0);
            assert!(state.view.scale >= 8.0 / 256.0);
        }
        assert_eq!(state.view.scale, 8.0 / 256.0);
        for _ in 0..50 {
            mapper.wheel(&mut state, -1.0);
            assert!(state.view.scale <= 1.0);
        }
        assert_eq!(state.view.scale, 1.0);
    }

    #[test]
    fn test_buttons_and_pause() {
        let mut state = sim(GridSize::square(16));
        let mapper = InteractionMapper::new();

        mapper.pointer_down(&mut state, PointerButton::Middle, Modifiers::default());
        assert_eq!(state.interaction.edit_intent().map(|(_, p)| p), Some(Paint::Keep));
        assert!(!state.is_paused());
        mapper.pointer_up(&mut state);

        mapper.pointer_down(&mut state, PointerButton::Other, Modifiers::default());
        assert_eq!(state.interaction.edit_intent(), None);
        assert!(!state.is_paused());
        mapper.pointer_up(&mut state);

        mapper.pointer_down(&mut state, PointerButton::Secondary, Modifiers::default());
        assert_eq!(state.interaction.edit_intent().map(|(_, p)| p), Some(Paint::Dead));
        assert!(state.is_paused());

        mapper.pointer_up(&mut state);
        assert_eq!(state.interaction.edit_intent(), None);
    }

    #[test]
    fn test_modifier_turns_drag_into_pan() {
        let mut state = sim(GridSize::square(64));
        state.view.scale = 0.5;
        let mapper = InteractionMapper::new();
        let viewport = Viewport::new(400, 400);
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };

        let start = Vector2::new(200.0, 200.0);
        mapper.pointer_moved(&mut state, start, viewport);
        let under_start = mapping::screen_to_simulation(start, viewport, &state.view, &state.view_config);

        mapper.pointer_down(&mut state, PointerButton::Primary, ctrl);
        assert_eq!(state.interaction.edit_intent(), None);

        let end = Vector2::new(260.0, 180.0);
        mapper.pointer_moved(&mut state, end, viewport);
        let under_end = mapping::screen_to_simulation(end, viewport, &state.view, &state.view_config);
        assert!((under_start.x - under_end.x).abs() < 1e-5);
        assert!((under_start.y - under_end.y).abs() < 1e-5);
    }

    #[test]
    fn test_touch_paints_alive_and_pauses() {
        let mut state = sim(GridSize::square(16));
        let mapper = InteractionMapper::new();
        let viewport = Viewport::new(160, 160);
        mapper.touch_start(&mut state, Vector2::new(80.0, 80.0), viewport);
        assert!(state.is_paused());
        assert_eq!(state.interaction.button, EditButton::PaintAlive);
        mapper.touch_moved(&mut state, Vector2::new(1.0, 159.0), viewport);
        assert_eq!(state.interaction.cursor, CellCoord::new(0, 0));
        mapper.touch_end(&mut state);
        assert_eq!(state.interaction.button, EditButton::None);
    }
}
