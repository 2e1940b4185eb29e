//! Material system
//!
//! Materials carry a base color and an optional texture map. They are stored
//! centrally in [`MaterialManager`] and referenced by drawables through their
//! name, so a texture arriving late only has to be attached in one place.

use std::collections::HashMap;
use wgpu::Device;

use super::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// 1.0 when a texture map is bound, 0.0 for the placeholder
    pub textured: f32,
    _padding: [f32; 3],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the bind group layout shared by every material
///
/// Binding order: material uniform, base texture, sampler.
pub fn material_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    placeholder: TextureResource,
}

/// Material definition with base color and optional texture map
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    texture: Option<TextureResource>,
    gpu: Option<MaterialGpu>,
    bind_group_dirty: bool,
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            texture: None,
            gpu: None,
            bind_group_dirty: false,
        }
    }

    /// Convenience constructor for opaque RGB colors
    pub fn rgb(name: &str, r: f32, g: f32, b: f32) -> Self {
        Self::new(name, [r, g, b, 1.0])
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Attaches a texture map; the bind group is rebuilt on the next sync
    pub fn set_texture(&mut self, texture: TextureResource) {
        self.texture = Some(texture);
        self.bind_group_dirty = true;
    }

    /// Creates or refreshes GPU resources for this material
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu.is_none() {
            let ubo = MaterialUBO::new(device);
            let placeholder = TextureResource::create_placeholder(device, queue);
            let bind_group = Self::build_bind_group(
                device,
                layout,
                &ubo,
                self.texture.as_ref().unwrap_or(&placeholder),
                &self.name,
            );
            self.gpu = Some(MaterialGpu {
                ubo,
                bind_group,
                placeholder,
            });
            self.bind_group_dirty = false;
        } else if self.bind_group_dirty {
            let gpu = self.gpu.as_mut().unwrap();
            gpu.bind_group = Self::build_bind_group(
                device,
                layout,
                &gpu.ubo,
                self.texture.as_ref().unwrap_or(&gpu.placeholder),
                &self.name,
            );
            self.bind_group_dirty = false;
        }

        let uniform = MaterialUniform {
            base_color: self.base_color,
            textured: if self.texture.is_some() { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        };
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    fn build_bind_group(
        device: &Device,
        layout: &BindGroupLayoutWithDesc,
        ubo: &MaterialUBO,
        texture: &TextureResource,
        name: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, &format!("Material Bind Group: {}", name))
    }

    /// Gets the bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Centralized storage for all materials in the scene
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };
        manager.add(Material::new("default", [0.8, 0.8, 0.8, 1.0]));
        manager
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), material);
        id
    }

    pub fn get(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Gets the material for a drawable, falling back to the default
    pub fn get_for_drawable(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.materials.get(id))
            .unwrap_or_else(|| {
                self.materials
                    .get(&self.default_material_id)
                    .expect("default material missing")
            })
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_material() {
        let mut manager = MaterialManager::new();
        manager.add(Material::rgb("green", 0.0, 1.0, 0.0));

        let missing = "nope".to_string();
        assert_eq!(manager.get_for_drawable(Some(&missing)).name, "default");
        assert_eq!(manager.get_for_drawable(None).name, "default");

        let green = "green".to_string();
        assert_eq!(manager.get_for_drawable(Some(&green)).name, "green");
    }
}
