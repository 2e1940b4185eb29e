//! Global uniform bindings for camera and lighting data
//!
//! Manages the GPU uniform buffer and bind group for per-frame global state
//! shared by every draw call: camera matrices plus the four light terms. A
//! light that is toggled invisible contributes an effective intensity of
//! zero, so visibility needs no shader-side branching.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::{
    gfx::scene::Scene,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in scene.wgsl exactly. Every vec3 is
/// paired with a scalar so rows pack to 16 bytes without explicit padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    ambient_color: [f32; 3],
    ambient_intensity: f32,

    sun_direction: [f32; 3],
    sun_intensity: f32,
    sun_color: [f32; 3],
    /// 1.0 while the directional light is visible and casting shadows
    sun_shadow: f32,

    spot_position: [f32; 3],
    spot_intensity: f32,
    spot_direction: [f32; 3],
    spot_cos_angle: f32,
    spot_color: [f32; 3],
    _pad0: f32,

    point_position: [f32; 3],
    point_intensity: f32,
    point_color: [f32; 3],
    _pad1: f32,

    light_view_proj: [[f32; 4]; 4],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Builds the directional light's view-projection matrix for the shadow pass
pub fn shadow_view_proj(sun_world_position: Vector3<f32>) -> Matrix4<f32> {
    // Only the direction matters for a directional light; back the eye out
    // along it so the whole scene fits inside the ortho volume.
    let dir = if sun_world_position.magnitude2() > 1e-8 {
        sun_world_position.normalize()
    } else {
        Vector3::unit_y()
    };
    let eye = Point3::new(dir.x * 20.0, dir.y * 20.0, dir.z * 20.0);
    let view = Matrix4::look_at_rh(eye, Point3::new(0.0, 0.0, 0.0), Vector3::unit_y());
    let proj = cgmath::ortho(-12.0, 12.0, -12.0, 12.0, 0.1, 40.0);
    proj * view
}

/// Snapshots the scene's camera and lights into the global uniform buffer
///
/// Called once per frame; the buffer wrapper skips the GPU write when
/// nothing changed.
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, scene: &Scene) {
    let camera = scene.camera.uniform;
    let ambient = &scene.ambient;
    let offset = scene.root.offset;
    let origin = Vector3::new(0.0, 0.0, 0.0);

    // Absent lights get a zero intensity row, same as hidden ones
    let mut sun_world = Vector3::new(0.0, 1.0, 0.0);
    let mut sun_direction = -Vector3::unit_y();
    let mut sun_intensity = 0.0;
    let mut sun_color = [1.0, 1.0, 1.0];
    let mut sun_shadow = 0.0;
    if let Some(sun) = scene.root.directional_light() {
        sun_world = sun.world_position(offset);
        sun_direction = (origin - sun_world).normalize();
        sun_intensity = sun.effective_intensity();
        sun_color = sun.color;
        sun_shadow = if sun.visible && sun.cast_shadow { 1.0 } else { 0.0 };
    }

    let mut spot_world = origin;
    let mut spot_direction = -Vector3::unit_y();
    let mut spot_intensity = 0.0;
    let mut spot_color = [1.0, 1.0, 1.0];
    let mut spot_cos_angle = 0.0;
    if let Some(spot) = scene.root.spot_light() {
        spot_world = spot.world_position(offset);
        spot_direction = (origin - spot_world).normalize();
        spot_intensity = spot.effective_intensity();
        spot_color = spot.color;
        spot_cos_angle = spot.spot_angle().unwrap_or(0.0).cos();
    }

    let mut point_world = origin;
    let mut point_intensity = 0.0;
    let mut point_color = [1.0, 1.0, 1.0];
    if let Some(point) = scene.root.point_light() {
        point_world = point.world_position(offset);
        point_intensity = point.effective_intensity();
        point_color = point.color;
    }

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        ambient_color: ambient.color,
        ambient_intensity: ambient.effective_intensity(),

        sun_direction: sun_direction.into(),
        sun_intensity,
        sun_color,
        sun_shadow,

        spot_position: spot_world.into(),
        spot_intensity,
        spot_direction: spot_direction.into(),
        spot_cos_angle,
        spot_color,
        _pad0: 0.0,

        point_position: point_world.into(),
        point_intensity,
        point_color,
        _pad1: 0.0,

        light_view_proj: shadow_view_proj(sun_world).into(),
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
///
/// Bound to slot 0 in every render pipeline.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayoutWithDesc {
        &self.bind_group_layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
