// src/gfx/scene/mod.rs
//! Scene graph, drawables, lights, and vertex formats

pub mod drawable;
pub mod light;
pub mod scene;
pub mod vertex;

pub use drawable::Drawable;
pub use light::{AmbientLight, Light, LightKind};
pub use scene::{Group, Scene};
pub use vertex::{HelperVertex, Vertex3D};
