//! Simulation driver
//!
//! Decides once per tick which program writes which surface and keeps the
//! generation pointer in sync. Every write goes through [`SimulationDriver::apply`]:
//! read the current surface, write the other one, flip.

use log::{debug, info, trace};
use rand::Rng;
use std::time::Duration;

use super::patterns::Pattern;
use super::state::SimulationState;
use super::traits::{CellBackend, Operation, SurfaceIndex};
use crate::config::GridSize;

/// What the driver did on its most recent operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    #[default]
    Idle,
    Stepping,
    Editing,
    Seeding,
}

/// Surfaces and blend position handed to the presentation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub previous: SurfaceIndex,
    pub current: SurfaceIndex,
    /// Normalized time since the last step (not clamped).
    pub fraction: f32,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub state: DriverState,
    /// Grid size applied by a drained resize request, if any.
    pub resized: Option<GridSize>,
    pub frame: Frame,
}

pub struct SimulationDriver<B: CellBackend> {
    backend: B,
    state: DriverState,
}

impl<B: CellBackend> SimulationDriver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: DriverState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Runs `operation` from the current surface into the other one and flips
    /// the generation pointer. Returns the surface that became current, or
    /// `None` for [`Operation::Idle`].
    pub fn apply(&mut self, sim: &mut SimulationState, operation: &Operation) -> Option<SurfaceIndex> {
        if !operation.writes() {
            return None;
        }
        let source = sim.generation.current();
        let target = sim.generation.target();
        self.backend.apply(operation, source, target);
        sim.generation.flip();
        trace!("{} pass {:?} -> {:?}", operation.name(), source, target);
        Some(target)
    }

    /// Advances the render loop by one display refresh.
    ///
    /// Pending resizes are applied first. Then, in priority order: a step when
    /// the generation lifetime has elapsed and the simulation is not paused,
    /// otherwise an edit when a paint button is held, otherwise nothing.
    pub fn tick(&mut self, sim: &mut SimulationState, now: Duration) -> TickReport {
        let resized = self.apply_pending_resize(sim);

        let elapsed = now.saturating_sub(sim.last_step);
        let (state, operation) =
            if elapsed >= sim.config.generation_lifetime() && !sim.is_paused() {
                (DriverState::Stepping, Operation::Step)
            } else if let Some((cursor, paint)) = sim.interaction.edit_intent() {
                (DriverState::Editing, Operation::Edit { cursor, paint })
            } else {
                (DriverState::Idle, Operation::Idle)
            };

        if state == DriverState::Stepping {
            sim.last_step = now;
            sim.generation_count += 1;
        }
        self.apply(sim, &operation);
        self.state = state;

        TickReport {
            state,
            resized,
            frame: self.frame(sim, now),
        }
    }

    /// Presentation inputs for time `now`.
    pub fn frame(&self, sim: &SimulationState, now: Duration) -> Frame {
        Frame {
            previous: sim.generation.previous(),
            current: sim.generation.current(),
            fraction: sim.intra_tick_fraction(now),
        }
    }

    /// Single manual step, allowed while paused.
    pub fn step_once(&mut self, sim: &mut SimulationState, now: Duration) {
        self.state = DriverState::Stepping;
        sim.last_step = now;
        sim.generation_count += 1;
        self.apply(sim, &Operation::Step);
    }

    /// Deterministic pseudo-random fill from `seed`.
    pub fn seed(&mut self, sim: &mut SimulationState, seed: f32) {
        info!("Seeding {} grid with seed {:.3}", sim.grid(), seed);
        let operation = Operation::Seed {
            seed,
            alive_ratio: sim.config.alive_ratio(),
        };
        self.reseed(sim, &operation);
    }

    /// Seeds with a random value in `[0.1, 0.9)` and returns it.
    pub fn randomize<R: Rng + ?Sized>(&mut self, sim: &mut SimulationState, rng: &mut R) -> f32 {
        let seed = rng.random_range(0.1..0.9);
        self.seed(sim, seed);
        seed
    }

    /// Sets every cell dead.
    pub fn clear(&mut self, sim: &mut SimulationState) {
        info!("Clearing {} grid", sim.grid());
        self.reseed(sim, &Operation::Clear);
    }

    /// Replaces the grid with `pattern` centred on a blank field.
    pub fn load_pattern(&mut self, sim: &mut SimulationState, pattern: Pattern) {
        info!("Loading {} pattern into {} grid", pattern.as_str(), sim.grid());
        let grid = pattern.stamp(sim.grid());
        self.reseed(sim, &Operation::Load(grid));
    }

    // Writes the non-current surface so the visible frame is untouched until
    // the pointer flips.
    fn reseed(&mut self, sim: &mut SimulationState, operation: &Operation) {
        self.state = DriverState::Seeding;
        self.apply(sim, operation);
        sim.generation_count = 0;
        sim.set_paused(false);
    }

    fn apply_pending_resize(&mut self, sim: &mut SimulationState) -> Option<GridSize> {
        let requested = sim.resize_queue.take()?;
        let size = sim.config.clamp_grid(requested);
        if size != requested {
            debug!("Resize request {} clamped to {}", requested, size);
        }
        if size == self.backend.size() {
            return None;
        }

        let old = self.backend.size();
        self.backend.resize(size);
        sim.config.set_grid(size);
        sim.clamp_view();
        info!("Resized grid {} -> {}", old, size);
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::config::ViewConfig;
    use crate::simulation::cpu::CpuCells;
    use crate::simulation::grid::{CellCoord, CellGrid};
    use crate::simulation::state::EditButton;
    use rand::{rngs::StdRng, SeedableRng};

    const LIFETIME: Duration = Duration::from_millis(100);

    fn setup(size: GridSize) -> (SimulationDriver<CpuCells>, SimulationState) {
        let config = SimulationConfig::default()
            .with_grid(size)
            .with_generation_lifetime(LIFETIME);
        let sim = SimulationState::new(config, ViewConfig::default());
        (SimulationDriver::new(CpuCells::new(size)), sim)
    }

    fn current(driver: &SimulationDriver<CpuCells>, sim: &SimulationState) -> CellGrid {
        driver.backend().surface(sim.generation.current()).clone()
    }

    #[test]
    fn test_pointer_flips_once_per_write_and_never_when_idle() {
        let (mut driver, mut sim) = setup(GridSize::square(8));

        let report = driver.tick(&mut sim, Duration::from_millis(10));
        assert_eq!(report.state, DriverState::Idle);
        assert_eq!(sim.generation.flips(), 0);

        let report = driver.tick(&mut sim, LIFETIME);
        assert_eq!(report.state, DriverState::Stepping);
        assert_eq!(sim.generation.flips(), 1);

        sim.interaction.button = EditButton::PaintAlive;
        let report = driver.tick(&mut sim, LIFETIME + Duration::from_millis(1));
        assert_eq!(report.state, DriverState::Editing);
        assert_eq!(sim.generation.flips(), 2);

        driver.seed(&mut sim, 0.5);
        assert_eq!(driver.state(), DriverState::Seeding);
        assert_eq!(sim.generation.flips(), 3);
    }

    #[test]
    fn test_idle_keeps_roles() {
        let (mut driver, mut sim) = setup(GridSize::square(8));
        driver.tick(&mut sim, LIFETIME);
        let before = driver.frame(&sim, LIFETIME);
        let report = driver.tick(&mut sim, LIFETIME + Duration::from_millis(5));
        assert_eq!(report.frame.current, before.current);
        assert_eq!(report.frame.previous, before.previous);
    }

    #[test]
    fn test_step_wins_over_held_edit_once_lifetime_elapsed() {
        let (mut driver, mut sim) = setup(GridSize::square(8));
        sim.interaction.button = EditButton::PaintAlive;

        let report = driver.tick(&mut sim, LIFETIME / 2);
        assert_eq!(report.state, DriverState::Editing);

        let report = driver.tick(&mut sim, LIFETIME);
        assert_eq!(report.state, DriverState::Stepping);
        assert_eq!(sim.last_step, LIFETIME);
    }

    #[test]
    fn test_pause_suppresses_steps_but_not_edits() {
        let (mut driver, mut sim) = setup(GridSize::square(8));
        sim.set_paused(true);
        assert_eq!(driver.tick(&mut sim, LIFETIME * 5).state, DriverState::Idle);

        sim.interaction.button = EditButton::PaintDead;
        assert_eq!(driver.tick(&mut sim, LIFETIME * 6).state, DriverState::Editing);
        assert_eq!(sim.generation_count, 0);
    }

    #[test]
    fn test_manual_step_while_paused() {
        let (mut driver, mut sim) = setup(GridSize::square(8));
        sim.set_paused(true);
        driver.step_once(&mut sim, Duration::from_millis(3));
        assert_eq!(sim.generation.flips(), 1);
        assert_eq!(sim.generation_count, 1);
        assert!(sim.is_paused());
    }

    #[test]
    fn test_seed_writes_hidden_surface_and_resumes() {
        let (mut driver, mut sim) = setup(GridSize::square(16));
        sim.set_paused(true);
        let visible = sim.generation.current();
        let before = driver.backend().surface(visible).clone();

        driver.seed(&mut sim, 0.5);

        assert_ne!(sim.generation.current(), visible);
        assert_eq!(driver.backend().surface(visible), &before);
        assert!(!sim.is_paused());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let counts: Vec<usize> = (0..3)
            .map(|_| {
                let (mut driver, mut sim) = setup(GridSize::square(4));
                driver.seed(&mut sim, 0.5);
                current(&driver, &sim).alive_count()
            })
            .collect();
        assert!(counts.windows(2).all(|pair| pair[0] == pair[1]));

        let (mut a, mut sim_a) = setup(GridSize::square(4));
        let (mut b, mut sim_b) = setup(GridSize::square(4));
        a.seed(&mut sim_a, 0.5);
        b.seed(&mut sim_b, 0.5);
        assert_eq!(current(&a, &sim_a), current(&b, &sim_b));
    }

    #[test]
    fn test_randomize_uses_seed_range() {
        let (mut driver, mut sim) = setup(GridSize::square(8));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let seed = driver.randomize(&mut sim, &mut rng);
            assert!((0.1..0.9).contains(&seed));
        }
    }

    #[test]
    fn test_lonely_cell_dies_after_one_step() {
        let size = GridSize::square(8);
        let (mut driver, mut sim) = setup(size);
        let mut grid = CellGrid::new(size);
        grid.set(3, 3, CellGrid::ALIVE);
        driver.apply(&mut sim, &Operation::Load(grid));

        driver.tick(&mut sim, LIFETIME);
        assert_eq!(current(&driver, &sim).alive_count(), 0);
    }

    #[test]
    fn test_painted_cell_counts_in_next_step() {
        let size = GridSize::square(12);
        let (mut driver, mut sim) = setup(size);
        let mut grid = CellGrid::new(size);
        grid.set(4, 4, CellGrid::ALIVE);
        grid.set(6, 4, CellGrid::ALIVE);
        driver.apply(&mut sim, &Operation::Load(grid));

        sim.interaction.cursor = CellCoord::new(5, 5);
        sim.interaction.button = EditButton::PaintAlive;
        assert_eq!(driver.tick(&mut sim, LIFETIME / 2).state, DriverState::Editing);
        sim.interaction.button = EditButton::None;

        assert_eq!(driver.tick(&mut sim, LIFETIME).state, DriverState::Stepping);
        // (5, 4) sees (4, 4), (6, 4) and the painted (5, 5).
        assert!(current(&driver, &sim).is_alive(5, 4));
    }

    #[test]
    fn test_resize_round_trip_through_driver() {
        let big = GridSize::square(64);
        let small = GridSize::square(32);
        let (mut driver, mut sim) = setup(big);
        driver.seed(&mut sim, 0.5);
        let before = current(&driver, &sim);

        sim.request_resize(small);
        assert_eq!(driver.tick(&mut sim, Duration::ZERO).resized, Some(small));
        sim.request_resize(big);
        assert_eq!(driver.tick(&mut sim, Duration::ZERO).resized, Some(big));

        let after = current(&driver, &sim);
        for y in 0..big.height {
            for x in 0..big.width {
                let expected = if x < small.width && y < small.height {
                    before.get(x, y)
                } else {
                    CellGrid::DEAD
                };
                assert_eq!(after.get(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_resize_requests_coalesce_and_clamp() {
        let size = GridSize::square(64);
        let config = SimulationConfig::default()
            .with_max_dimension(256)
            .with_grid(size);
        let mut sim = SimulationState::new(config, ViewConfig::default());
        let mut driver = SimulationDriver::new(CpuCells::new(size));
        sim.view.scale = 8.0 / 64.0;
        sim.request_resize(GridSize::square(16));
        sim.request_resize(GridSize::square(8192));

        let report = driver.tick(&mut sim, Duration::ZERO);
        assert_eq!(report.resized, Some(GridSize::square(256)));
        assert_eq!(driver.backend().size(), GridSize::square(256));
        assert_eq!(sim.grid(), GridSize::square(256));
        assert_eq!(sim.view.scale, 8.0 / 64.0);

        sim.request_resize(GridSize::square(16));
        driver.tick(&mut sim, Duration::ZERO);
        assert_eq!(sim.view.scale, 0.5);
    }

    #[test]
    fn test_same_size_resize_is_ignored() {
        let (mut driver, mut sim) = setup(GridSize::square(32));
        sim.request_resize(GridSize::square(32));
        assert_eq!(driver.tick(&mut sim, Duration::ZERO).resized, None);
    }

    #[test]
    fn test_clear_and_pattern_reset_generation_count() {
        let (mut driver, mut sim) = setup(GridSize::square(64));
        driver.load_pattern(&mut sim, Pattern::Glider);
        assert_eq!(current(&driver, &sim).alive_count(), 5);
        driver.tick(&mut sim, LIFETIME);
        driver.tick(&mut sim, LIFETIME * 2);
        assert_eq!(sim.generation_count, 2);
        assert_eq!(current(&driver, &sim).alive_count(), 5);

        driver.clear(&mut sim);
        assert_eq!(sim.generation_count, 0);
        assert_eq!(current(&driver, &sim).alive_count(), 0);
    }

    #[test]
    fn test_middle_button_edit_keeps_cells() {
        let size = GridSize::square(8);
        let (mut driver, mut sim) = setup(size);
        let mut grid = CellGrid::new(size);
        grid.set(2, 2, CellGrid::ALIVE);
        driver.apply(&mut sim, &Operation::Load(grid.clone()));
        let flips = sim.generation.flips();

        sim.interaction.cursor = CellCoord::new(2, 2);
        sim.interaction.button = EditButton::Hold;
        assert_eq!(driver.tick(&mut sim, LIFETIME / 2).state, DriverState::Editing);
        assert_eq!(sim.generation.flips(), flips + 1);
        assert_eq!(current(&driver, &sim), grid);
    }
}
