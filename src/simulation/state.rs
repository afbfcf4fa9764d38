//! Shared simulation state
//!
//! Everything the render loop mutates lives in one owned [`SimulationState`]
//! that is passed by reference into the driver, the compositor and the
//! interaction mapper. There is a single writer (the render thread).

use cgmath::{Vector2, Zero};
use std::time::Duration;

use super::grid::CellCoord;
use super::traits::{Paint, SurfaceIndex};
use crate::config::{GridSize, SimulationConfig, ViewConfig};

/// Which surface holds the latest generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPointer {
    current: SurfaceIndex,
    flips: u64,
}

impl Default for GenerationPointer {
    fn default() -> Self {
        Self {
            current: SurfaceIndex::A,
            flips: 0,
        }
    }
}

impl GenerationPointer {
    pub fn current(&self) -> SurfaceIndex {
        self.current
    }

    pub fn previous(&self) -> SurfaceIndex {
        self.current.other()
    }

    /// Surface the next write goes to.
    pub fn target(&self) -> SurfaceIndex {
        self.current.other()
    }

    /// Makes the just-written target current.
    pub fn flip(&mut self) {
        self.current = self.current.other();
        self.flips += 1;
    }

    /// Total number of flips since startup.
    pub fn flips(&self) -> u64 {
        self.flips
    }
}

/// Pan and zoom of the presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Zoom factor; 1.0 shows the whole grid, smaller values zoom in.
    pub scale: f32,
    /// Pan in simulation units, applied before `scale`.
    pub offset: Vector2<f32>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2::zero(),
        }
    }
}

/// Button interpretation of the active pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditButton {
    #[default]
    None,
    PaintAlive,
    PaintDead,
    /// Middle button: the edit pass runs but leaves the cursor cell as is.
    Hold,
    Pan,
}

impl EditButton {
    /// Paint intent for the edit program, if any.
    pub fn paint(self) -> Option<Paint> {
        match self {
            EditButton::PaintAlive => Some(Paint::Alive),
            EditButton::PaintDead => Some(Paint::Dead),
            EditButton::Hold => Some(Paint::Keep),
            EditButton::None | EditButton::Pan => None,
        }
    }
}

/// Pointer, button and pause state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    /// Grid cell under the pointer.
    pub cursor: CellCoord,
    /// Last pointer position in physical pixels.
    pub pointer_position: Option<Vector2<f32>>,
    pub button: EditButton,
    pub paused: bool,
}

impl InteractionState {
    /// Edit intent for this tick, if a paint button is active.
    pub fn edit_intent(&self) -> Option<(CellCoord, Paint)> {
        self.button.paint().map(|paint| (self.cursor, paint))
    }
}

/// Latest-value-wins resize requests, drained once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeQueue {
    pending: Option<GridSize>,
}

impl ResizeQueue {
    pub fn push(&mut self, size: GridSize) {
        self.pending = Some(size);
    }

    pub fn take(&mut self) -> Option<GridSize> {
        self.pending.take()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// All mutable state of the render loop
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimulationConfig,
    pub view_config: ViewConfig,
    pub generation: GenerationPointer,
    pub view: ViewState,
    pub interaction: InteractionState,
    pub resize_queue: ResizeQueue,
    /// Tick time of the last automatic or manual step.
    pub last_step: Duration,
    /// Completed steps since the last seed/clear/load.
    pub generation_count: u64,
}

impl SimulationState {
    pub fn new(config: SimulationConfig, view_config: ViewConfig) -> Self {
        Self {
            config,
            view_config,
            generation: GenerationPointer::default(),
            view: ViewState::default(),
            interaction: InteractionState::default(),
            resize_queue: ResizeQueue::default(),
            last_step: Duration::ZERO,
            generation_count: 0,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.config.grid()
    }

    pub fn is_paused(&self) -> bool {
        self.interaction.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.interaction.paused = paused;
    }

    /// Normalized time since the last step; exceeds 1 while paused.
    pub fn intra_tick_fraction(&self, now: Duration) -> f32 {
        let lifetime = self.config.generation_lifetime().as_secs_f32();
        now.saturating_sub(self.last_step).as_secs_f32() / lifetime
    }

    /// Queues a grid resize for the next tick; later requests replace earlier
    /// ones.
    pub fn request_resize(&mut self, size: GridSize) {
        self.resize_queue.push(size);
    }

    /// Re-applies the zoom bounds for the current grid width.
    pub fn clamp_view(&mut self) {
        self.view.scale = self
            .view_config
            .clamp_scale(self.view.scale, self.config.grid().width);
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(SimulationConfig::default(), ViewConfig::default())
    }
}
