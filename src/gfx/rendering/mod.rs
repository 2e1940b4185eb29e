// src/gfx/rendering/mod.rs
//! Rendering engine and pipeline management

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
