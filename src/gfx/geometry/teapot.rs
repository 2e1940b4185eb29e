//! # Teapot Generation
//!
//! A procedural teapot built from a lathed body-and-lid profile plus swept
//! tubes for the spout and handle. Proportions follow the classic teapot
//! silhouette; `size` scales the whole model (body radius ~= `size`).

use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

/// Body and lid silhouette as (radius, height) pairs, in units of the body
/// radius. Runs from the base center up to the lid knob tip.
const PROFILE: &[[f32; 2]] = &[
    [0.00, 0.00],
    [0.55, 0.02],
    [0.82, 0.10],
    [0.98, 0.32],
    [1.00, 0.50],
    [0.95, 0.72],
    [0.80, 0.95],
    [0.62, 1.05],
    [0.56, 1.12],
    [0.50, 1.16],
    [0.30, 1.20],
    [0.14, 1.26],
    [0.12, 1.34],
    [0.20, 1.40],
    [0.12, 1.46],
    [0.00, 1.50],
];

/// Generate a teapot of the given size
///
/// # Arguments
/// * `size` - Overall scale; the body radius roughly equals this value
/// * `segments` - Tessellation level for the lathe and the swept tubes
pub fn generate_teapot(size: f32, segments: u32) -> GeometryData {
    let segs = segments.max(4);

    let mut data = lathe_profile(PROFILE, size, segs * 2);
    data.append(spout(size, segs));
    data.append(handle(size, segs));

    // Center vertically so the teapot sits like the other primitives
    let half_height = 0.75 * size;
    for v in &mut data.vertices {
        v[1] -= half_height;
    }

    data
}

/// Revolves a (radius, height) profile around the Y axis
fn lathe_profile(profile: &[[f32; 2]], scale: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let rows = profile.len();

    for (row, point) in profile.iter().enumerate() {
        // Profile tangent from neighbors, for the surface normal
        let prev = profile[row.saturating_sub(1)];
        let next = profile[(row + 1).min(rows - 1)];
        let dr = next[0] - prev[0];
        let dy = next[1] - prev[1];
        // Rotate the tangent a quarter turn to point outward
        let len = (dr * dr + dy * dy).sqrt().max(1e-6);
        let (nr, ny) = (dy / len, -dr / len);

        for i in 0..=segments {
            let angle = i as f32 * 2.0 * PI / segments as f32;
            let (sin_a, cos_a) = angle.sin_cos();

            data.vertices.push([
                scale * point[0] * cos_a,
                scale * point[1],
                scale * point[0] * sin_a,
            ]);
            data.normals.push([nr * cos_a, ny, nr * sin_a]);
            data.tex_coords.push([
                i as f32 / segments as f32,
                row as f32 / (rows - 1) as f32,
            ]);
        }
    }

    for row in 0..rows as u32 - 1 {
        for i in 0..segments {
            let a = row * (segments + 1) + i;
            let b = a + segments + 1;

            data.indices.push(a);
            data.indices.push(a + 1);
            data.indices.push(b);

            data.indices.push(b);
            data.indices.push(a + 1);
            data.indices.push(b + 1);
        }
    }

    data
}

fn spout(size: f32, segments: u32) -> GeometryData {
    // Quadratic curve from the body wall out and up to the pour lip
    let p0 = Vector3::new(0.90, 0.35, 0.0);
    let p1 = Vector3::new(1.45, 0.45, 0.0);
    let p2 = Vector3::new(1.65, 0.98, 0.0);

    let steps = 8;
    let mut path = Vec::with_capacity(steps + 1);
    let mut radii = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let q = p0 * (1.0 - t) * (1.0 - t) + p1 * 2.0 * (1.0 - t) * t + p2 * t * t;
        path.push(q * size);
        // Tapers from base to tip
        radii.push((0.18 - 0.09 * t) * size);
    }

    sweep_tube(&path, &radii, segments)
}

fn handle(size: f32, segments: u32) -> GeometryData {
    // Half ellipse from the upper body back around to the lower body
    let steps = 12;
    let mut path = Vec::with_capacity(steps + 1);
    let mut radii = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f32 * PI / steps as f32;
        let x = -0.95 - 0.55 * t.sin();
        let y = 0.625 + 0.275 * t.cos();
        path.push(Vector3::new(x * size, y * size, 0.0));
        radii.push(0.08 * size);
    }

    sweep_tube(&path, &radii, segments)
}

/// Sweeps a circular cross-section along a polyline path
///
/// Paths are expected to lie in the XY plane, which makes the sweep frame
/// trivial: one basis vector stays in-plane, the other is the Z axis.
fn sweep_tube(path: &[Vector3<f32>], radii: &[f32], segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let rows = path.len();
    let z_axis = Vector3::unit_z();

    for row in 0..rows {
        let prev = path[row.saturating_sub(1)];
        let next = path[(row + 1).min(rows - 1)];
        let tangent = (next - prev).normalize();
        let side = tangent.cross(z_axis).normalize();

        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            let normal = side * cos_a + z_axis * sin_a;
            let pos = path[row] + normal * radii[row];

            data.vertices.push([pos.x, pos.y, pos.z]);
            data.normals.push([normal.x, normal.y, normal.z]);
            data.tex_coords.push([
                i as f32 / segs as f32,
                row as f32 / (rows - 1) as f32,
            ]);
        }
    }

    for row in 0..rows as u32 - 1 {
        for i in 0..segs {
            let a = row * (segs + 1) + i;
            let b = a + segs + 1;

            data.indices.push(a);
            data.indices.push(b);
            data.indices.push(a + 1);

            data.indices.push(b);
            data.indices.push(b + 1);
            data.indices.push(a + 1);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teapot_generation() {
        let teapot = generate_teapot(0.5, 7);
        assert!(teapot.triangle_count() > 100);
        assert_eq!(teapot.vertices.len(), teapot.normals.len());
        assert_eq!(teapot.vertices.len(), teapot.tex_coords.len());
        for &i in &teapot.indices {
            assert!((i as usize) < teapot.vertices.len());
        }
    }

    #[test]
    fn test_teapot_scale() {
        let teapot = generate_teapot(0.5, 8);
        // Spout tip is the farthest feature from the axis (~1.75 body radii)
        for v in &teapot.vertices {
            assert!(v[0].abs() <= 0.5 * 1.8);
            assert!(v[1].abs() <= 0.5 * 1.0);
        }
    }

    #[test]
    fn test_teapot_normals_unit_length() {
        let teapot = generate_teapot(1.0, 6);
        for n in &teapot.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-3, "normal length {}", len);
        }
    }
}
