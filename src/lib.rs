// src/lib.rs
//! scenelab
//!
//! A small 3D scene playground built on wgpu and winit: procedural
//! primitives, four light terms with wireframe helpers, and an imgui debug
//! panel bound straight to the live scene state.

pub mod app;
pub mod compose;
pub mod gfx;
pub mod ui;
pub mod wgpu_utils;

pub use app::SceneApp;

/// Creates the application with the demo scene composed and bound
pub fn default() -> anyhow::Result<SceneApp> {
    SceneApp::with_demo_scene()
}
