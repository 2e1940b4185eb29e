// src/gfx/mod.rs
//! Graphics: camera, geometry, scene graph, rendering, and GPU resources

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
