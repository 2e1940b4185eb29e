//! Drawable scene objects
//!
//! A [`Drawable`] couples generated geometry with a material reference and a
//! transform. GPU resources are created lazily on the first sync so the
//! scene graph can be built and inspected without a device.

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    gfx::geometry::GeometryData,
    gfx::resources::material::MaterialId,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::vertex::Vertex3D;

/// Per-object uniform data
///
/// `params.x` is 1.0 when the object receives shadows, the rest is spare.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub params: [f32; 4],
}

pub type ModelUBO = UniformBuffer<ModelUniform>;

/// Creates the bind group layout for per-object uniforms
pub fn model_bind_group_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Model Bind Group Layout")
}

/// GPU-side mesh with uploaded vertex and index buffers
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    /// Uploads geometry as an interleaved vertex buffer plus index buffer
    pub fn from_geometry(device: &wgpu::Device, geometry: &GeometryData, label: &str) -> Self {
        let vertices: Vec<Vertex3D> = geometry
            .vertices
            .iter()
            .zip(geometry.normals.iter())
            .zip(geometry.tex_coords.iter())
            .map(|((&position, &normal), &tex_coords)| Vertex3D {
                position,
                normal,
                tex_coords,
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

pub struct DrawableGpu {
    pub mesh: Mesh,
    pub ubo: ModelUBO,
    pub bind_group: wgpu::BindGroup,
}

/// A renderable object in the scene graph
pub struct Drawable {
    pub name: String,
    pub geometry: GeometryData,
    pub material_id: Option<MaterialId>,
    pub position: Vector3<f32>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub gpu: Option<DrawableGpu>,
}

impl Drawable {
    pub fn new(name: &str, geometry: GeometryData) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material_id: None,
            position: Vector3::new(0.0, 0.0, 0.0),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            gpu: None,
        }
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// World transform given the parent group's offset
    pub fn world_transform(&self, group_offset: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::from_translation(group_offset + self.position)
    }

    /// Creates GPU resources if needed and pushes the current transform
    pub fn update_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        group_offset: Vector3<f32>,
    ) {
        if self.gpu.is_none() {
            let mesh = Mesh::from_geometry(device, &self.geometry, &self.name);
            let ubo = ModelUBO::new(device);
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .create(device, &format!("Model Bind Group: {}", self.name));
            self.gpu = Some(DrawableGpu {
                mesh,
                ubo,
                bind_group,
            });
        }

        let uniform = ModelUniform {
            model: self.world_transform(group_offset).into(),
            params: [if self.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        };
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn world_transform_includes_group_offset() {
        let drawable = Drawable::new("cube", generate_box(1.0, 1.0, 1.0)).with_position(-2.0, 0.0, 0.0);
        let transform = drawable.world_transform(Vector3::new(0.0, 0.5, 0.0));
        assert_eq!(transform.w.x, -2.0);
        assert_eq!(transform.w.y, 0.5);
        assert_eq!(transform.w.z, 0.0);
    }

    #[test]
    fn builder_flags_stick() {
        let drawable = Drawable::new("ground", generate_box(8.0, 0.5, 8.0))
            .with_material("gray")
            .with_shadows(false, true);
        assert_eq!(drawable.material_id.as_deref(), Some("gray"));
        assert!(!drawable.cast_shadow);
        assert!(drawable.receive_shadow);
        assert!(drawable.visible);
    }
}
