use cgmath::{perspective, EuclideanSpace, Matrix4, Point3, Rad, Vector3};

use super::{convert_matrix4_to_array, CameraUniform};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera that re-aims at a fixed target every frame
///
/// Position and clip planes are live-tunable from the control panel; the
/// frame loop calls [`TargetCamera::update_view_proj`] each tick so any
/// out-of-band mutation is picked up on the very next frame.
#[derive(Debug, Clone, Copy)]
pub struct TargetCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl TargetCamera {
    pub fn new(position: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Recomputes the cached uniform from the current mutable state
    pub fn update_view_proj(&mut self) {
        self.uniform.view_position =
            [self.position.x, self.position.y, self.position.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }

    /// Keeps the projection in sync with the window surface
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_view_proj();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect_but_not_position() {
        let mut camera = TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), 1.0);
        camera.resize_projection(1600, 800);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 32.0));
    }

    #[test]
    fn resize_ignores_degenerate_sizes() {
        let mut camera = TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), 1.5);
        camera.resize_projection(0, 800);
        assert_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn view_proj_tracks_position_edits() {
        let mut camera = TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), 1.0);
        let before = camera.uniform.view_proj;
        camera.position.x = 10.0;
        camera.update_view_proj();
        assert_ne!(before, camera.uniform.view_proj);
        assert_eq!(camera.uniform.view_position, [10.0, 0.0, 32.0, 1.0]);
    }
}
