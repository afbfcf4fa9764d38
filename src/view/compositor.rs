//! Presentation parameters
//!
//! CPU side of the present program: blend curve, scrollbar geometry and the
//! uniform block. [`shade`] restates the present program per pixel for tests.

use bytemuck::{Pod, Zeroable};
use cgmath::Vector2;

use super::mapping::{self, Viewport};
use crate::config::ViewConfig;
use crate::simulation::grid::CellGrid;
use crate::simulation::state::{SimulationState, ViewState};

/// Previous→current blend weight. Saturates after a quarter of a generation.
pub fn blend_factor(fraction: f32) -> f32 {
    (fraction * 4.0).clamp(0.0, 1.0)
}

/// Pan/zoom indicator bars drawn just outside the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrollbars {
    pub visible: bool,
    /// Start of the bars along x and y, in view space.
    pub start: Vector2<f32>,
    /// Fraction of the grid currently visible.
    pub length: f32,
}

impl Scrollbars {
    /// Offset of the bars from the grid edge, and their thickness.
    pub const GAP: f32 = 0.01;
    pub const THICKNESS: f32 = 0.005;

    pub fn new(view: &ViewState, config: &ViewConfig) -> Self {
        Self {
            visible: view.scale < config.scrollbar_threshold,
            start: view.offset * view.scale,
            length: view.scale,
        }
    }

    /// Coverage of the bars at view-space position `st`.
    pub fn coverage(&self, st: Vector2<f32>) -> f32 {
        if !self.visible {
            return 0.0;
        }
        let horizontal = rect(
            st,
            Vector2::new(self.start.x, -Self::GAP),
            Vector2::new(self.length, Self::THICKNESS),
        );
        let vertical = rect(
            st,
            Vector2::new(-Self::GAP, self.start.y),
            Vector2::new(Self::THICKNESS, self.length),
        );
        horizontal + vertical
    }
}

fn rect(st: Vector2<f32>, origin: Vector2<f32>, size: Vector2<f32>) -> f32 {
    let inside = st.x >= origin.x
        && st.x <= origin.x + size.x
        && st.y >= origin.y
        && st.y <= origin.y + size.y;
    if inside {
        1.0
    } else {
        0.0
    }
}

/// Uniform block of the present program
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PresentUniforms {
    pub screen_resolution: [f32; 2],
    pub resolution: [f32; 2],
    pub offset: [f32; 2],
    pub scrollbar_start: [f32; 2],
    pub scale: f32,
    pub blend: f32,
    pub padding: f32,
    pub dot_radius: f32,
    pub edge_softness: f32,
    pub scrollbar_length: f32,
    pub scrollbar_visible: f32,
    pub _padding: f32,
}

impl PresentUniforms {
    pub fn new(sim: &SimulationState, viewport: Viewport, fraction: f32) -> Self {
        let grid = sim.grid();
        let config = &sim.view_config;
        let bars = Scrollbars::new(&sim.view, config);
        Self {
            screen_resolution: viewport.size(),
            resolution: [grid.width as f32, grid.height as f32],
            offset: sim.view.offset.into(),
            scrollbar_start: bars.start.into(),
            scale: sim.view.scale,
            blend: blend_factor(fraction),
            padding: config.padding,
            dot_radius: config.dot_radius,
            edge_softness: config.edge_softness,
            scrollbar_length: bars.length,
            scrollbar_visible: if bars.visible { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }
}

fn smoothstep(low: f32, high: f32, x: f32) -> f32 {
    let t = ((x - low) / (high - low)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Grey level the present program writes for the pixel centred at `position`.
pub fn shade(
    sim: &SimulationState,
    viewport: Viewport,
    fraction: f32,
    previous: &CellGrid,
    current: &CellGrid,
    position: Vector2<f32>,
) -> f32 {
    let config = &sim.view_config;
    let view_st = mapping::screen_to_view(position, viewport, config);
    let bars = Scrollbars::new(&sim.view, config).coverage(view_st);

    let st = mapping::view_to_simulation(view_st, &sim.view);
    let Some(cell) = mapping::cell_at(st, sim.grid()) else {
        return bars.min(1.0);
    };

    let res = Vector2::new(sim.grid().width as f32, sim.grid().height as f32);
    let radius = (config.dot_radius / res.x).min(config.dot_radius / res.y);
    let centre = Vector2::new(
        (cell.x as f32 + 0.5) / res.x,
        (cell.y as f32 + 0.5) / res.y,
    );
    let dx = st.x - centre.x;
    let dy = st.y - centre.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let mask = 1.0 - smoothstep(radius, radius + config.edge_softness * sim.view.scale, distance);

    let blend = blend_factor(fraction);
    let last = previous.get(cell.x, cell.y);
    let next = current.get(cell.x, cell.y);
    let value = last + (next - last) * blend;
    (value * mask + bars).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridSize, SimulationConfig};

    fn sim(size: GridSize) -> SimulationState {
        SimulationState::new(
            SimulationConfig::default().with_grid(size),
            ViewConfig::default(),
        )
    }

    #[test]
    fn test_blend_is_monotonic_and_saturates_at_quarter() {
        let mut last = blend_factor(0.0);
        assert_eq!(last, 0.0);
        for i in 1..=400 {
            let value = blend_factor(i as f32 / 100.0);
            assert!(value >= last);
            last = value;
        }
        assert_eq!(blend_factor(0.25), 1.0);
        assert_eq!(blend_factor(0.125), 0.5);
        assert_eq!(blend_factor(7.0), 1.0);
    }

    #[test]
    fn test_scrollbars_only_when_zoomed_in() {
        let config = ViewConfig::default();
        let mut view = ViewState::default();
        assert!(!Scrollbars::new(&view, &config).visible);
        view.scale = 0.5;
        let bars = Scrollbars::new(&view, &config);
        assert!(bars.visible);
        assert_eq!(bars.length, 0.5);
        assert_eq!(bars.coverage(Vector2::new(0.25, -0.008)), 1.0);
        assert_eq!(bars.coverage(Vector2::new(0.75, -0.008)), 0.0);
    }

    #[test]
    fn test_uniform_block_layout() {
        assert_eq!(std::mem::size_of::<PresentUniforms>(), 64);
    }

    #[test]
    fn test_cell_centre_shows_blended_state() {
        let size = GridSize::square(4);
        let state = sim(size);
        let viewport = Viewport::new(400, 400);
        let previous = CellGrid::new(size);
        let mut current = CellGrid::new(size);
        current.fill(CellGrid::ALIVE);

        // Centre of the screen is the corner shared by four cells; step a
        // little into cell (2, 2) instead, which sits up and to the right.
        let pad = state.view_config.padding;
        let st = Vector2::new(2.5 / 4.0, 2.5 / 4.0);
        let position = Vector2::new(
            ((st.x + pad) / (1.0 + 2.0 * pad)) * 400.0,
            (1.0 - (st.y + pad) / (1.0 + 2.0 * pad)) * 400.0,
        );

        assert!(shade(&state, viewport, 0.0, &previous, &current, position) < 1e-4);
        let half = shade(&state, viewport, 0.0625, &previous, &current, position);
        assert!((half - 0.25).abs() < 1e-3, "got {half}");
        assert!((shade(&state, viewport, 1.0, &previous, &current, position) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_outside_grid_is_background() {
        let size = GridSize::square(4);
        let state = sim(size);
        let viewport = Viewport::new(800, 400);
        let mut alive = CellGrid::new(size);
        alive.fill(CellGrid::ALIVE);
        let left_edge = Vector2::new(1.0, 200.0);
        assert_eq!(shade(&state, viewport, 1.0, &alive, &alive, left_edge), 0.0);
    }
}
