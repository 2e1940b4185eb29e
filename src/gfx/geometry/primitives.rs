//! # Primitive Shape Generation
//!
//! Box, sphere, cylinder/cone and torus generators. All shapes are centered
//! at the origin in a Y-up coordinate system.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box with the given side lengths
///
/// Each face has four dedicated vertices with an outward face normal and
/// UV coordinates spanning 0 to 1.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    let positions = [
        // Front face (positive Z)
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
        // Back face (negative Z)
        [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd], [hw, -hh, -hd],
        // Left face (negative X)
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        // Right face (positive X)
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        // Top face (positive Y)
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        // Bottom face (negative Y)
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = normals.to_vec();
    data.tex_coords = tex_coords.to_vec();

    data.indices = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Radius of the sphere
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            // Spherical to Cartesian, Y-up
            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.vertices.push([radius * x, radius * y, radius * z]);
            data.normals.push([x, y, z]);

            let u = long as f32 / long_segs as f32;
            let v = lat as f32 / lat_segs as f32;
            data.tex_coords.push([u, v]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a capped cylinder, or a cone when `radius_top` is zero
///
/// The cylinder runs along the Y axis from -height/2 to +height/2. Side
/// normals are slanted when the radii differ so cones shade correctly.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half_height = height * 0.5;

    // Slope term for the side normal, constant around the circumference
    let slope = (radius_bottom - radius_top) / height;

    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        let y = -half_height + v * height;
        let radius = radius_bottom + (radius_top - radius_bottom) * v;

        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let cos_a = angle.cos();
            let sin_a = angle.sin();

            data.vertices.push([radius * cos_a, y, radius * sin_a]);
            let len = (1.0 + slope * slope).sqrt();
            data.normals.push([cos_a / len, slope / len, sin_a / len]);
            data.tex_coords.push([i as f32 / segs as f32, v]);
        }
    }

    for row in 0..rows {
        for i in 0..segs {
            let a = row * (segs + 1) + i;
            let b = a + segs + 1;

            data.indices.push(a);
            data.indices.push(a + 1);
            data.indices.push(b);

            data.indices.push(b);
            data.indices.push(a + 1);
            data.indices.push(b + 1);
        }
    }

    if radius_bottom > 0.0 {
        add_cap(&mut data, radius_bottom, -half_height, segs, false);
    }
    if radius_top > 0.0 {
        add_cap(&mut data, radius_top, half_height, segs, true);
    }

    data
}

/// Adds a circular cap at the given height, facing up or down
fn add_cap(data: &mut GeometryData, radius: f32, y: f32, segments: u32, facing_up: bool) {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);
    data.tex_coords.push([0.5, 0.5]);

    let ring = data.vertices.len() as u32;
    for i in 0..=segments {
        let angle = i as f32 * 2.0 * PI / segments as f32;
        let (cos_a, sin_a) = (angle.cos(), angle.sin());
        data.vertices.push([radius * cos_a, y, radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords
            .push([0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a]);
    }

    for i in 0..segments {
        if facing_up {
            data.indices.push(center);
            data.indices.push(ring + i + 1);
            data.indices.push(ring + i);
        } else {
            data.indices.push(center);
            data.indices.push(ring + i);
            data.indices.push(ring + i + 1);
        }
    }
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center
/// * `tube` - Radius of the tube
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments around the main ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let rad_segs = radial_segments.max(3);
    let tub_segs = tubular_segments.max(3);

    for j in 0..=rad_segs {
        let v = j as f32 * 2.0 * PI / rad_segs as f32;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tub_segs {
            let u = i as f32 * 2.0 * PI / tub_segs as f32;
            let (sin_u, cos_u) = u.sin_cos();

            // Tube center for this ring position
            let cx = radius * cos_u;
            let cy = radius * sin_u;

            let x = (radius + tube * cos_v) * cos_u;
            let y = (radius + tube * cos_v) * sin_u;
            let z = tube * sin_v;

            data.vertices.push([x, y, z]);

            let nx = x - cx;
            let ny = y - cy;
            let nz = z;
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            data.normals.push([nx / len, ny / len, nz / len]);

            data.tex_coords
                .push([i as f32 / tub_segs as f32, j as f32 / rad_segs as f32]);
        }
    }

    for j in 0..rad_segs {
        for i in 0..tub_segs {
            let a = j * (tub_segs + 1) + i;
            let b = a + tub_segs + 1;

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
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_dimensions() {
        let ground = generate_box(8.0, 0.5, 8.0);
        for v in &ground.vertices {
            assert!(v[0].abs() <= 4.0 + 1e-6);
            assert!(v[1].abs() <= 0.25 + 1e-6);
            assert!(v[2].abs() <= 4.0 + 1e-6);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.5, 8, 6);
        assert!(!sphere.vertices.is_empty());
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        // Every vertex sits on the sphere surface
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.5, 0.5, 1.0, 32, 16);
        assert_eq!(cylinder.vertices.len(), cylinder.normals.len());
        assert!(cylinder.triangle_count() > 0);
    }

    #[test]
    fn test_cone_skips_top_cap() {
        let cone = generate_cylinder(0.0, 0.5, 1.0, 9, 1);
        let capped = generate_cylinder(0.5, 0.5, 1.0, 9, 1);
        assert!(cone.vertex_count() < capped.vertex_count());

        // Apex ring collapses to the Y axis
        let apex_count = cone
            .vertices
            .iter()
            .filter(|v| (v[1] - 0.5).abs() < 1e-6 && v[0].abs() < 1e-6 && v[2].abs() < 1e-6)
            .count();
        assert!(apex_count > 0);
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.5, 0.25, 20, 20);
        assert_eq!(torus.vertices.len(), 21 * 21);
        assert_eq!(torus.triangle_count(), (20 * 20 * 2) as usize);

        // Normals are unit length
        for n in &torus.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }
}
