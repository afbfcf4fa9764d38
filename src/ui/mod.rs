//! Control panel overlay

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, PanelAction, PanelStatus};
