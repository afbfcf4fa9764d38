//! Simulation and view configuration
//!
//! Plain configuration structs with builder-style setters. The simulation
//! config is only mutated through explicit resize / speed-change calls, and the
//! grid dimensions are always replaced as a pair.

use std::fmt;
use std::time::Duration;

/// Hard cap on either grid dimension, regardless of what the device supports.
pub const MAX_GRID_DIMENSION: u32 = 4096;

/// Smallest exponent offered by the logarithmic grid-size slider (8 cells).
pub const MIN_GRID_EXPONENT: u32 = 3;

/// Probability that the seed program marks a cell alive.
pub const DEFAULT_ALIVE_RATIO: f32 = 0.15;

/// Bounds for the generation lifetime slider, in milliseconds.
pub const MIN_GENERATION_LIFETIME_MS: u64 = 1;
pub const MAX_GENERATION_LIFETIME_MS: u64 = 1000;

/// Width × height of the automaton grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Square grid with `2^exponent` cells per side (slider mapping).
    pub fn from_log2(exponent: u32) -> Self {
        Self::square(1u32 << exponent.min(31))
    }

    /// Exponent of the width, rounded down.
    pub fn width_log2(&self) -> u32 {
        self.width.max(1).ilog2()
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Region shared by two grids when both are anchored at the origin.
    pub fn overlap(&self, other: GridSize) -> GridSize {
        GridSize::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Clamps both dimensions into `1..=max`.
    pub fn clamped(&self, max: u32) -> GridSize {
        let max = max.max(1);
        GridSize::new(self.width.clamp(1, max), self.height.clamp(1, max))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration of the automaton itself
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    grid: GridSize,
    generation_lifetime: Duration,
    alive_ratio: f32,
    max_dimension: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::square(64),
            generation_lifetime: Duration::from_millis(125),
            alive_ratio: DEFAULT_ALIVE_RATIO,
            max_dimension: MAX_GRID_DIMENSION,
        }
    }
}

impl SimulationConfig {
    pub fn with_grid(mut self, grid: GridSize) -> Self {
        self.grid = grid.clamped(self.max_dimension);
        self
    }

    pub fn with_generation_lifetime(mut self, lifetime: Duration) -> Self {
        self.set_generation_lifetime(lifetime);
        self
    }

    pub fn with_alive_ratio(mut self, ratio: f32) -> Self {
        self.alive_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Limits grid dimensions to what the device can allocate, never above
    /// [`MAX_GRID_DIMENSION`]. The current grid is re-clamped.
    pub fn with_max_dimension(mut self, device_limit: u32) -> Self {
        self.max_dimension = device_limit.clamp(1, MAX_GRID_DIMENSION);
        self.grid = self.grid.clamped(self.max_dimension);
        self
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn generation_lifetime(&self) -> Duration {
        self.generation_lifetime
    }

    pub fn alive_ratio(&self) -> f32 {
        self.alive_ratio
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Largest exponent the grid-size slider may reach.
    pub fn max_grid_exponent(&self) -> u32 {
        self.max_dimension.ilog2()
    }

    /// Fail-closed clamp applied to every resize request before it reaches
    /// the surfaces.
    pub fn clamp_grid(&self, requested: GridSize) -> GridSize {
        requested.clamped(self.max_dimension)
    }

    /// Replaces both dimensions at once, returning the size actually applied.
    pub fn set_grid(&mut self, requested: GridSize) -> GridSize {
        self.grid = self.clamp_grid(requested);
        self.grid
    }

    pub fn set_generation_lifetime(&mut self, lifetime: Duration) {
        self.generation_lifetime = lifetime.clamp(
            Duration::from_millis(MIN_GENERATION_LIFETIME_MS),
            Duration::from_millis(MAX_GENERATION_LIFETIME_MS),
        );
    }
}

/// Constants shared by the presentation pass and the pointer mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Scale multiplier for a wheel step away from the user.
    pub zoom_in_factor: f32,
    /// Scale multiplier for a wheel step towards the user.
    pub zoom_out_factor: f32,
    /// The minimum zoom always shows at least this many cells across.
    pub min_visible_cells: f32,
    /// Border around the unit square, as a fraction of the axis range.
    pub padding: f32,
    /// Dot radius relative to one cell.
    pub dot_radius: f32,
    /// Width of the smoothstep edge of a dot at scale 1.
    pub edge_softness: f32,
    /// Scrollbars are only drawn below this scale.
    pub scrollbar_threshold: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.5,
            zoom_out_factor: 0.66,
            min_visible_cells: 8.0,
            padding: 0.02,
            dot_radius: 0.4,
            edge_softness: 0.002,
            scrollbar_threshold: 0.98,
        }
    }
}

impl ViewConfig {
    /// Smallest scale allowed for a grid `width` cells wide.
    pub fn min_scale(&self, width: u32) -> f32 {
        (self.min_visible_cells / width.max(1) as f32).min(1.0)
    }

    pub fn clamp_scale(&self, scale: f32, width: u32) -> f32 {
        scale.clamp(self.min_scale(width), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_exponent_maps_to_power_of_two() {
        assert_eq!(GridSize::from_log2(6), GridSize::square(64));
        assert_eq!(GridSize::from_log2(12), GridSize::square(4096));
        assert_eq!(GridSize::square(64).width_log2(), 6);
    }

    #[test]
    fn test_resize_request_is_clamped_to_max_dimension() {
        let mut config = SimulationConfig::default().with_max_dimension(2048);
        let applied = config.set_grid(GridSize::new(8192, 16));
        assert_eq!(applied, GridSize::new(2048, 16));
        assert_eq!(config.grid(), applied);
    }

    #[test]
    fn test_device_limit_never_exceeds_hard_cap() {
        let config = SimulationConfig::default().with_max_dimension(16384);
        assert_eq!(config.max_dimension(), MAX_GRID_DIMENSION);
        assert_eq!(config.max_grid_exponent(), 12);
    }

    #[test]
    fn test_overlap_is_component_wise_minimum() {
        let a = GridSize::new(64, 16);
        let b = GridSize::new(32, 128);
        assert_eq!(a.overlap(b), GridSize::new(32, 16));
    }

    #[test]
    fn test_generation_lifetime_is_bounded() {
        let mut config = SimulationConfig::default();
        config.set_generation_lifetime(Duration::ZERO);
        assert_eq!(config.generation_lifetime(), Duration::from_millis(1));
        config.set_generation_lifetime(Duration::from_secs(10));
        assert_eq!(config.generation_lifetime(), Duration::from_millis(1000));
    }

    #[test]
    fn test_alive_ratio_is_a_probability() {
        assert_eq!(SimulationConfig::default().with_alive_ratio(1.5).alive_ratio(), 1.0);
        assert_eq!(SimulationConfig::default().with_alive_ratio(-0.2).alive_ratio(), 0.0);
        assert_eq!(SimulationConfig::default().with_alive_ratio(0.25).alive_ratio(), 0.25);
    }

    #[test]
    fn test_min_scale_shows_eight_cells() {
        let view = ViewConfig::default();
        assert_eq!(view.min_scale(64), 0.125);
        assert_eq!(view.min_scale(4), 1.0);
        assert_eq!(view.clamp_scale(0.01, 256), 8.0 / 256.0);
        assert_eq!(view.clamp_scale(3.0, 256), 1.0);
    }
}
