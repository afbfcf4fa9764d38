//! Screen-to-simulation mapping
//!
//! Shared by the present program and the pointer mapping so that the cell
//! under the cursor is exactly the cell drawn there. Screen positions are in
//! physical pixels with a top-left origin; simulation space is the unit square
//! with y pointing up (grid row 0 at the bottom).

use cgmath::Vector2;

use crate::config::{GridSize, ViewConfig};
use crate::simulation::grid::CellCoord;
use crate::simulation::state::ViewState;

/// Size of the render target in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Per-axis stretch so the shorter side maps 1:1 and the longer side
    /// extends past the unit square.
    pub fn aspect(&self) -> Vector2<f32> {
        let ratio = self.width as f32 / self.height as f32;
        Vector2::new(ratio.max(1.0), (1.0 / ratio).max(1.0))
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Padded, aspect-corrected position of a screen point before pan and zoom.
pub fn screen_to_view(position: Vector2<f32>, viewport: Viewport, config: &ViewConfig) -> Vector2<f32> {
    let aspect = viewport.aspect();
    let u = position.x / viewport.width as f32;
    let v = 1.0 - position.y / viewport.height as f32;
    let pad = config.padding;
    let x = (u - 0.5) * aspect.x + 0.5;
    let y = (v - 0.5) * aspect.y + 0.5;
    Vector2::new(x * (1.0 + 2.0 * pad) - pad, y * (1.0 + 2.0 * pad) - pad)
}

/// Applies pan then zoom to a view-space position.
pub fn view_to_simulation(st: Vector2<f32>, view: &ViewState) -> Vector2<f32> {
    (st + view.offset) * view.scale
}

pub fn screen_to_simulation(
    position: Vector2<f32>,
    viewport: Viewport,
    view: &ViewState,
    config: &ViewConfig,
) -> Vector2<f32> {
    view_to_simulation(screen_to_view(position, viewport, config), view)
}

/// Whether a simulation-space position lies on the grid.
pub fn inside_unit_square(st: Vector2<f32>) -> bool {
    (0.0..1.0).contains(&st.x) && (0.0..1.0).contains(&st.y)
}

/// Cell containing `st`, or `None` outside the grid.
pub fn cell_at(st: Vector2<f32>, grid: GridSize) -> Option<CellCoord> {
    inside_unit_square(st).then(|| clamped_cell_at(st, grid))
}

/// Cell containing `st`, with positions off the grid pinned to the border.
pub fn clamped_cell_at(st: Vector2<f32>, grid: GridSize) -> CellCoord {
    let x = (st.x.clamp(0.0, 1.0) * grid.width as f32).floor() as u32;
    let y = (st.y.clamp(0.0, 1.0) * grid.height as f32).floor() as u32;
    CellCoord::new(x.min(grid.width - 1), y.min(grid.height - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_square_viewport_centre_maps_to_centre() {
        let viewport = Viewport::new(800, 800);
        let st = screen_to_view(Vector2::new(400.0, 400.0), viewport, &ViewConfig::default());
        assert!(approx(st.x, 0.5) && approx(st.y, 0.5));
    }

    #[test]
    fn test_screen_top_is_simulation_top() {
        let viewport = Viewport::new(100, 100);
        let config = ViewConfig::default();
        let top = screen_to_view(Vector2::new(50.0, 0.0), viewport, &config);
        let bottom = screen_to_view(Vector2::new(50.0, 100.0), viewport, &config);
        assert!(approx(top.y, 1.0 + config.padding));
        assert!(approx(bottom.y, -config.padding));
    }

    #[test]
    fn test_wide_viewport_stretches_long_axis() {
        let viewport = Viewport::new(200, 100);
        assert_eq!(viewport.aspect(), Vector2::new(2.0, 1.0));
        let config = ViewConfig {
            padding: 0.0,
            ..ViewConfig::default()
        };
        let left = screen_to_view(Vector2::new(0.0, 50.0), viewport, &config);
        assert!(approx(left.x, -0.5));
        let quarter = screen_to_view(Vector2::new(50.0, 50.0), viewport, &config);
        assert!(approx(quarter.x, 0.0));
    }

    #[test]
    fn test_zoom_and_pan_apply_offset_first() {
        let view = ViewState {
            scale: 0.5,
            offset: Vector2::new(0.25, 0.0),
        };
        let st = view_to_simulation(Vector2::new(0.5, 0.5), &view);
        assert!(approx(st.x, 0.375) && approx(st.y, 0.25));
    }

    #[test]
    fn test_cells_outside_grid() {
        let grid = GridSize::square(4);
        assert_eq!(cell_at(Vector2::new(-0.01, 0.5), grid), None);
        assert_eq!(cell_at(Vector2::new(0.99, 0.0), grid), Some(CellCoord::new(3, 0)));
        assert_eq!(clamped_cell_at(Vector2::new(1.5, -2.0), grid), CellCoord::new(3, 0));
    }
}
