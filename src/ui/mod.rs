// src/ui/mod.rs
//! Debug UI: imgui integration and the bound control panel

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{Control, ControlPanel, Folder};
