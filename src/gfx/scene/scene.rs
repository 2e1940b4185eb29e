//! Scene graph
//!
//! The scene owns a camera, the ambient lighting term, the material and
//! texture stores, and a single root [`Group`] holding every drawable and
//! positional light. Members can be added and looked up by name; there is
//! no removal, the graph lives as long as the scene.

use cgmath::Vector3;
use wgpu::Device;

use crate::gfx::{
    camera::TargetCamera,
    resources::{
        material::MaterialManager, texture_loader::TextureLoader,
        texture_resource::TextureResource,
    },
};
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

use super::drawable::Drawable;
use super::light::{AmbientLight, Light, LightKind};

/// A transform node holding drawables and lights
pub struct Group {
    pub offset: Vector3<f32>,
    pub drawables: Vec<Drawable>,
    pub lights: Vec<Light>,
}

impl Group {
    pub fn new() -> Self {
        Self {
            offset: Vector3::new(0.0, 0.0, 0.0),
            drawables: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_drawable(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn find_drawable(&self, name: &str) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.name == name)
    }

    pub fn find_drawable_mut(&mut self, name: &str) -> Option<&mut Drawable> {
        self.drawables.iter_mut().find(|d| d.name == name)
    }

    pub fn find_light(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name == name)
    }

    pub fn find_light_mut(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.name == name)
    }

    pub fn directional_light(&self) -> Option<&Light> {
        self.lights
            .iter()
            .find(|l| l.kind == LightKind::Directional)
    }

    pub fn spot_light(&self) -> Option<&Light> {
        self.lights
            .iter()
            .find(|l| matches!(l.kind, LightKind::Spot { .. }))
    }

    pub fn point_light(&self) -> Option<&Light> {
        self.lights.iter().find(|l| l.kind == LightKind::Point)
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

/// Main scene containing the graph, materials, camera, and lighting
pub struct Scene {
    pub camera: TargetCamera,
    pub ambient: AmbientLight,
    pub root: Group,
    pub material_manager: MaterialManager,
    pub texture_loader: TextureLoader,
}

impl Scene {
    pub fn new(camera: TargetCamera) -> Self {
        Self {
            camera,
            ambient: AmbientLight::new([1.0, 1.0, 1.0], 1.0),
            root: Group::new(),
            material_manager: MaterialManager::new(),
            texture_loader: TextureLoader::new(),
        }
    }

    /// Per-frame CPU-side update
    pub fn update(&mut self) {
        self.camera.update_view_proj();
    }

    pub fn drawable_count(&self) -> usize {
        self.root.drawables.len()
    }

    pub fn light_count(&self) -> usize {
        self.root.lights.len()
    }

    pub fn helper_count(&self) -> usize {
        // Every positional light carries exactly one helper
        self.root.lights.len()
    }

    /// Creates missing GPU resources and pushes all dirty state
    ///
    /// Called once per frame before rendering. Also drains the texture
    /// loader, attaching any newly decoded images to their materials.
    pub fn sync_gpu(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        model_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for loaded in self.texture_loader.poll() {
            if let Some(material) = self.material_manager.get_mut(&loaded.material_id) {
                let texture = TextureResource::create_from_rgba_data(
                    device,
                    queue,
                    &loaded.pixels,
                    loaded.width,
                    loaded.height,
                    &loaded.material_id,
                );
                material.set_texture(texture);
            } else {
                log::warn!(
                    "decoded texture targets unknown material '{}'",
                    loaded.material_id
                );
            }
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);

        let offset = self.root.offset;
        for drawable in &mut self.root.drawables {
            drawable.update_gpu_resources(device, queue, model_layout, offset);
        }
        for light in &mut self.root.lights {
            light.update_helper_gpu(device, queue, model_layout, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_sphere;

    fn test_scene() -> Scene {
        Scene::new(TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), 1.0))
    }

    #[test]
    fn members_are_found_by_name() {
        let mut scene = test_scene();
        scene
            .root
            .add_drawable(Drawable::new("sphere", generate_sphere(0.5, 32, 16)));
        scene
            .root
            .add_light(Light::point("point", [1.0, 1.0, 1.0], 1.0));

        assert!(scene.root.find_drawable("sphere").is_some());
        assert!(scene.root.find_drawable("missing").is_none());
        assert!(scene.root.find_light("point").is_some());
        assert!(scene.root.point_light().is_some());
        assert!(scene.root.directional_light().is_none());
    }

    #[test]
    fn census_counts_graph_members() {
        let mut scene = test_scene();
        scene
            .root
            .add_drawable(Drawable::new("sphere", generate_sphere(0.5, 32, 16)));
        scene
            .root
            .add_light(Light::directional("sun", [1.0, 1.0, 1.0], 0.5));
        scene.root.add_light(Light::point("point", [1.0, 1.0, 1.0], 1.0));

        assert_eq!(scene.drawable_count(), 1);
        assert_eq!(scene.light_count(), 2);
        assert_eq!(scene.helper_count(), 2);
    }

    #[test]
    fn lights_resolve_by_kind() {
        let mut group = Group::new();
        group.add_light(Light::spot("spot", [0.0, 1.0, 0.0], 1.0, 0.4));
        group.add_light(Light::directional("sun", [1.0, 1.0, 1.0], 0.5));

        assert_eq!(group.spot_light().unwrap().name, "spot");
        assert_eq!(group.directional_light().unwrap().name, "sun");
        assert!(group.point_light().is_none());
    }
}
