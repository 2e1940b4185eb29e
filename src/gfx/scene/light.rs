//! Light sources and their wireframe helpers
//!
//! The scene carries one ambient term plus positional lights in the graph.
//! Every positional light owns a [`Helper`], a line-list gizmo that tracks
//! the light's position, color, and (for spots) cone angle. The spot cone
//! is a unit cone whose opening angle is applied through its transform, so
//! angle edits never rebuild geometry.

use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};
use wgpu::util::DeviceExt;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
    uniform_buffer::UniformBuffer,
};

use super::drawable::ModelUniform;
use super::vertex::HelperVertex;

/// Scene-wide ambient lighting term
///
/// Not part of the graph; it has no position and casts no shadows.
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub visible: bool,
}

impl AmbientLight {
    pub fn new(color: [f32; 3], intensity: f32) -> Self {
        Self {
            color,
            intensity,
            visible: true,
        }
    }

    /// Intensity as the shader sees it; hidden lights contribute nothing
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }
}

/// The positional light variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Spot { angle: f32 },
    Point,
}

/// Line-list geometry for a light helper
#[derive(Debug, Clone, Default)]
pub struct HelperGeometry {
    pub positions: Vec<[f32; 3]>,
    /// Pairs of indices, one pair per line segment
    pub indices: Vec<u32>,
}

impl HelperGeometry {
    fn line(&mut self, a: u32, b: u32) {
        self.indices.push(a);
        self.indices.push(b);
    }

    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Unit square in the XY plane plus a ray of length 1 along -Z
pub fn directional_helper_geometry() -> HelperGeometry {
    let mut geometry = HelperGeometry::default();
    let h = 0.5;
    geometry.positions = vec![
        [-h, -h, 0.0],
        [h, -h, 0.0],
        [h, h, 0.0],
        [-h, h, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
    ];
    geometry.line(0, 1);
    geometry.line(1, 2);
    geometry.line(2, 3);
    geometry.line(3, 0);
    geometry.line(4, 5);
    geometry
}

/// Unit cone: apex at the origin, circle of radius 1 at z = -1
///
/// The opening angle comes from the transform's XY scale.
pub fn spot_helper_geometry() -> HelperGeometry {
    const SEGMENTS: u32 = 16;
    let mut geometry = HelperGeometry::default();
    geometry.positions.push([0.0, 0.0, 0.0]);
    for i in 0..SEGMENTS {
        let theta = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
        geometry.positions.push([theta.cos(), theta.sin(), -1.0]);
    }
    for i in 0..SEGMENTS {
        let current = 1 + i;
        let next = 1 + (i + 1) % SEGMENTS;
        geometry.line(current, next);
    }
    // Four flank lines from the apex
    for i in 0..4 {
        geometry.line(0, 1 + i * SEGMENTS / 4);
    }
    geometry
}

/// Three orthogonal rings around the light position
pub fn point_helper_geometry() -> HelperGeometry {
    const SEGMENTS: u32 = 16;
    const RADIUS: f32 = 0.3;
    let mut geometry = HelperGeometry::default();
    for ring in 0..3u32 {
        let base = geometry.positions.len() as u32;
        for i in 0..SEGMENTS {
            let theta = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            let (a, b) = (RADIUS * theta.cos(), RADIUS * theta.sin());
            geometry.positions.push(match ring {
                0 => [a, b, 0.0],
                1 => [a, 0.0, b],
                _ => [0.0, a, b],
            });
        }
        for i in 0..SEGMENTS {
            geometry.line(base + i, base + (i + 1) % SEGMENTS);
        }
    }
    geometry
}

pub struct HelperGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub ubo: UniformBuffer<ModelUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// Wireframe gizmo visualizing a light
pub struct Helper {
    pub visible: bool,
    pub geometry: HelperGeometry,
    pub gpu: Option<HelperGpu>,
}

impl Helper {
    fn new(geometry: HelperGeometry) -> Self {
        Self {
            visible: true,
            geometry,
            gpu: None,
        }
    }
}

/// A positional light in the scene graph
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub helper: Helper,
}

impl Light {
    pub fn directional(name: &str, color: [f32; 3], intensity: f32) -> Self {
        Self::new(name, LightKind::Directional, color, intensity, directional_helper_geometry())
    }

    pub fn spot(name: &str, color: [f32; 3], intensity: f32, angle: f32) -> Self {
        Self::new(name, LightKind::Spot { angle }, color, intensity, spot_helper_geometry())
    }

    pub fn point(name: &str, color: [f32; 3], intensity: f32) -> Self {
        Self::new(name, LightKind::Point, color, intensity, point_helper_geometry())
    }

    fn new(
        name: &str,
        kind: LightKind,
        color: [f32; 3],
        intensity: f32,
        helper_geometry: HelperGeometry,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color,
            intensity,
            position: Vector3::new(0.0, 0.0, 0.0),
            visible: true,
            cast_shadow: false,
            helper: Helper::new(helper_geometry),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn world_position(&self, group_offset: Vector3<f32>) -> Vector3<f32> {
        group_offset + self.position
    }

    /// Intensity as the shader sees it; hidden lights contribute nothing
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }

    pub fn spot_angle(&self) -> Option<f32> {
        match self.kind {
            LightKind::Spot { angle } => Some(angle),
            _ => None,
        }
    }

    pub fn set_spot_angle(&mut self, angle: f32) {
        if let LightKind::Spot { angle: ref mut a } = self.kind {
            *a = angle;
        }
    }

    /// World transform of the helper gizmo
    ///
    /// Directional and spot helpers are aimed from the light toward the
    /// origin; the spot cone's XY scale encodes its current opening angle.
    pub fn helper_transform(&self, group_offset: Vector3<f32>) -> Matrix4<f32> {
        let world = self.world_position(group_offset);
        let to_target = -world;
        let length = to_target.magnitude();

        match self.kind {
            LightKind::Point => Matrix4::from_translation(world),
            LightKind::Directional => {
                aim_at(world, to_target) * Matrix4::from_nonuniform_scale(1.0, 1.0, length.max(1e-3))
            }
            LightKind::Spot { angle } => {
                let radius = length * angle.tan();
                aim_at(world, to_target)
                    * Matrix4::from_nonuniform_scale(radius, radius, length.max(1e-3))
            }
        }
    }

    /// Creates the helper's GPU resources if needed and pushes its transform
    pub fn update_helper_gpu(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        group_offset: Vector3<f32>,
    ) {
        if self.helper.gpu.is_none() {
            let vertices: Vec<HelperVertex> = self
                .helper
                .geometry
                .positions
                .iter()
                .map(|&position| HelperVertex { position })
                .collect();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Helper Vertex Buffer", self.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Helper Index Buffer", self.name)),
                contents: bytemuck::cast_slice(&self.helper.geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let ubo = UniformBuffer::new(device);
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .create(device, &format!("Helper Bind Group: {}", self.name));
            self.helper.gpu = Some(HelperGpu {
                vertex_buffer,
                index_buffer,
                index_count: self.helper.geometry.indices.len() as u32,
                ubo,
                bind_group,
            });
        }

        let uniform = ModelUniform {
            model: self.helper_transform(group_offset).into(),
            params: [self.color[0], self.color[1], self.color[2], 1.0],
        };
        if let Some(gpu) = &mut self.helper.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }
}

/// Rigid transform placing the origin at `world` with -Z pointing along `dir`
fn aim_at(world: Vector3<f32>, dir: Vector3<f32>) -> Matrix4<f32> {
    let z_axis = if dir.magnitude2() > 1e-8 {
        (-dir).normalize()
    } else {
        Vector3::unit_z()
    };
    let up = if z_axis.y.abs() > 0.999 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let x_axis = up.cross(z_axis).normalize();
    let y_axis = z_axis.cross(x_axis);
    Matrix4::from_cols(
        x_axis.extend(0.0),
        y_axis.extend(0.0),
        z_axis.extend(0.0),
        Vector4::new(world.x, world.y, world.z, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hidden_light_contributes_nothing() {
        let mut light = Light::point("point", [1.0, 1.0, 1.0], 1.0);
        assert_eq!(light.effective_intensity(), 1.0);
        light.visible = false;
        assert_eq!(light.effective_intensity(), 0.0);
        assert_eq!(light.intensity, 1.0);
    }

    #[test]
    fn spot_cone_scale_follows_angle() {
        let angle = std::f32::consts::FRAC_PI_8;
        let light = Light::spot("spot", [0.0, 1.0, 0.0], 1.0, angle).with_position(0.0, 3.0, 0.0);
        let transform = light.helper_transform(Vector3::new(0.0, 0.0, 0.0));

        // Circle rim vertex (1, 0, -1) lands at distance length*tan(angle) from the axis
        let rim = transform * Vector4::new(1.0, 0.0, -1.0, 1.0);
        let radius = (rim.x * rim.x + rim.z * rim.z).sqrt();
        assert_relative_eq!(radius, 3.0 * angle.tan(), epsilon = 1e-5);
        // The cone base reaches the target plane
        assert_relative_eq!(rim.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn spot_angle_updates_in_place() {
        let mut light = Light::spot("spot", [0.0, 1.0, 0.0], 1.0, 0.2);
        light.set_spot_angle(0.7);
        assert_eq!(light.spot_angle(), Some(0.7));

        let mut point = Light::point("point", [1.0, 1.0, 1.0], 1.0);
        point.set_spot_angle(0.7);
        assert_eq!(point.spot_angle(), None);
    }

    #[test]
    fn helper_geometries_are_line_lists() {
        for geometry in [
            directional_helper_geometry(),
            spot_helper_geometry(),
            point_helper_geometry(),
        ] {
            assert_eq!(geometry.indices.len() % 2, 0);
            let max = *geometry.indices.iter().max().unwrap() as usize;
            assert!(max < geometry.positions.len());
            assert!(geometry.segment_count() > 0);
        }
    }
}
