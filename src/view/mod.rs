//! Presentation math and input mapping

pub mod compositor;
pub mod interaction;
pub mod mapping;

pub use compositor::{blend_factor, PresentUniforms, Scrollbars};
pub use interaction::{InteractionMapper, Modifiers, PointerButton};
pub use mapping::Viewport;
