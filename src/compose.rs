//! Scene composition
//!
//! Builds the demo scene: a ground slab and six primitives grouped half a
//! unit above the origin, an ambient term plus three positional lights with
//! helpers, and the debug panel bound to all of it. Needs no GPU, the
//! graph and panel are plain data until the first frame syncs them.

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::gfx::{
    camera::TargetCamera,
    geometry::{generate_box, generate_cylinder, generate_sphere, generate_teapot, generate_torus},
    resources::material::Material,
    scene::{AmbientLight, Drawable, Light, Scene},
};
use crate::ui::ControlPanel;

/// Creates the scene with its camera at the default viewing distance
pub fn create_scene(aspect: f32) -> Scene {
    Scene::new(TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), aspect))
}

/// Populates the scene graph and binds the debug panel to it
pub fn compose_scene(scene: &mut Scene, panel: &mut ControlPanel) {
    scene.root.offset = Vector3::new(0.0, 0.5, 0.0);

    add_materials(scene);
    add_drawables(scene);
    add_lights(scene);
    bind_panel(panel);

    log::info!(
        "scene composed: {} drawables, {} lights, {} helpers",
        scene.drawable_count(),
        scene.light_count(),
        scene.helper_count()
    );
}

fn add_materials(scene: &mut Scene) {
    let materials = &mut scene.material_manager;
    materials.add(Material::rgb("gray", 0.698, 0.698, 0.698));
    materials.add(Material::rgb("green", 0.0, 1.0, 0.0));
    materials.add(Material::rgb("red", 1.0, 0.0, 0.0));
    materials.add(Material::rgb("blue", 0.0, 0.0, 1.0));
    // White bases so the maps show unmodulated once they arrive
    materials.add(Material::rgb("uv", 1.0, 1.0, 1.0));
    materials.add(Material::rgb("crate", 1.0, 1.0, 1.0));
    materials.add(Material::rgb("earth", 1.0, 1.0, 1.0));
    materials.add(Material::rgb("brick", 1.0, 1.0, 1.0));

    scene.texture_loader.request("uv", "assets/uv.jpeg");
    scene.texture_loader.request("crate", "assets/crate.png");
    scene.texture_loader.request("earth", "assets/earth.jpeg");
    scene.texture_loader.request("brick", "assets/brick.jpeg");
}

fn add_drawables(scene: &mut Scene) {
    let group = &mut scene.root;

    group.add_drawable(
        Drawable::new("ground", generate_box(8.0, 0.5, 8.0))
            .with_material("gray")
            .with_position(0.0, -2.0, 0.0)
            .with_shadows(false, true),
    );

    group.add_drawable(
        Drawable::new("cube", generate_box(1.0, 1.0, 1.0))
            .with_material("uv")
            .with_position(-2.0, 0.0, 0.0)
            .with_shadows(true, false),
    );

    group.add_drawable(
        Drawable::new("sphere", generate_sphere(0.5, 32, 16))
            .with_material("green")
            .with_position(0.0, 1.5, 0.0)
            .with_shadows(true, false),
    );

    // Open cone: zero top radius, 9 radial segments
    group.add_drawable(
        Drawable::new("cone", generate_cylinder(0.0, 0.5, 1.0, 9, 1))
            .with_material("red")
            .with_position(2.0, 0.0, 0.0)
            .with_shadows(true, false),
    );

    group.add_drawable(
        Drawable::new("cylinder", generate_cylinder(0.5, 0.5, 1.0, 32, 16))
            .with_material("red")
            .with_position(2.0, 1.5, 0.0)
            .with_shadows(true, false),
    );

    group.add_drawable(
        Drawable::new("torus", generate_torus(0.5, 0.25, 20, 20))
            .with_material("green")
            .with_shadows(true, false),
    );

    group.add_drawable(
        Drawable::new("teapot", generate_teapot(0.5, 16))
            .with_material("blue")
            .with_position(-2.0, 1.5, 0.0)
            .with_shadows(true, false),
    );
}

fn add_lights(scene: &mut Scene) {
    scene.ambient = AmbientLight::new([1.0, 1.0, 1.0], 0.5);

    scene.root.add_light(
        Light::directional("directional", [1.0, 1.0, 1.0], 0.5)
            .with_position(1.0, 2.0, 2.0)
            .with_shadow(),
    );

    scene.root.add_light(
        Light::spot("spot", [0.0, 1.0, 0.0], 1.0, PI / 8.0).with_position(2.0, 3.0, 2.0),
    );

    scene
        .root
        .add_light(Light::point("point", [1.0, 1.0, 1.0], 1.0).with_position(2.0, 2.0, 2.0));
}

fn bind_panel(panel: &mut ControlPanel) {
    // Only the camera group starts expanded
    let camera = panel.folder("Camera");
    camera.open();
    let camera = camera.subfolder("controls");
    camera.open();
    camera.slider(
        "X",
        -50.0,
        50.0,
        0.0,
        |scene| scene.camera.position.x,
        |scene, v| scene.camera.position.x = v,
    );
    camera.slider(
        "Y",
        -50.0,
        50.0,
        0.0,
        |scene| scene.camera.position.y,
        |scene, v| scene.camera.position.y = v,
    );
    camera.slider(
        "Z",
        -50.0,
        50.0,
        0.0,
        |scene| scene.camera.position.z,
        |scene, v| scene.camera.position.z = v,
    );
    camera.slider(
        "near",
        0.1,
        100.0,
        0.0,
        |scene| scene.camera.znear,
        |scene, v| scene.camera.znear = v,
    );
    camera.slider(
        "far",
        0.0,
        1000.0,
        0.0,
        |scene| scene.camera.zfar,
        |scene, v| scene.camera.zfar = v,
    );

    let ambient = panel.folder("ambient light");
    ambient.toggle(
        "visible",
        |scene| scene.ambient.visible,
        |scene, v| scene.ambient.visible = v,
    );
    ambient.slider(
        "intensity",
        0.0,
        1.0,
        0.1,
        |scene| scene.ambient.intensity,
        |scene, v| scene.ambient.intensity = v,
    );
    ambient.color(
        "color",
        |scene| scene.ambient.color,
        |scene, rgb| scene.ambient.color = rgb,
    );

    let directional = panel.folder("directional light");
    // Visibility slaves the helper to the light, nothing else touches it
    directional.toggle(
        "visible",
        |scene| light(scene, "directional").visible,
        |scene, v| {
            let l = light_mut(scene, "directional");
            l.visible = v;
            l.helper.visible = v;
        },
    );
    directional.slider(
        "intensity",
        0.0,
        1.0,
        0.25,
        |scene| light(scene, "directional").intensity,
        |scene, v| light_mut(scene, "directional").intensity = v,
    );
    directional.slider(
        "y",
        1.0,
        4.0,
        0.5,
        |scene| light(scene, "directional").position.y,
        |scene, v| light_mut(scene, "directional").position.y = v,
    );
    directional.toggle(
        "castShadow",
        |scene| light(scene, "directional").cast_shadow,
        |scene, v| light_mut(scene, "directional").cast_shadow = v,
    );
    directional.color(
        "color",
        |scene| light(scene, "directional").color,
        |scene, rgb| light_mut(scene, "directional").color = rgb,
    );

    let spot = panel.folder("spot light");
    spot.toggle(
        "visible",
        |scene| light(scene, "spot").visible,
        |scene, v| {
            let l = light_mut(scene, "spot");
            l.visible = v;
            l.helper.visible = v;
        },
    );
    spot.slider(
        "intensity",
        0.0,
        4.0,
        0.5,
        |scene| light(scene, "spot").intensity,
        |scene, v| light_mut(scene, "spot").intensity = v,
    );
    spot.slider(
        "angle",
        PI / 16.0,
        PI / 2.0,
        PI / 16.0,
        |scene| light(scene, "spot").spot_angle().unwrap_or(0.0),
        |scene, v| light_mut(scene, "spot").set_spot_angle(v),
    );
    spot.toggle(
        "castShadow",
        |scene| light(scene, "spot").cast_shadow,
        |scene, v| light_mut(scene, "spot").cast_shadow = v,
    );

    let point = panel.folder("point light");
    point.toggle(
        "visible",
        |scene| light(scene, "point").visible,
        |scene, v| {
            let l = light_mut(scene, "point");
            l.visible = v;
            l.helper.visible = v;
        },
    );
    point.slider(
        "intensity",
        0.0,
        2.0,
        0.25,
        |scene| light(scene, "point").intensity,
        |scene, v| light_mut(scene, "point").intensity = v,
    );
    point.slider(
        "x",
        -2.0,
        4.0,
        0.5,
        |scene| light(scene, "point").position.x,
        |scene, v| light_mut(scene, "point").position.x = v,
    );
    point.slider(
        "y",
        -2.0,
        4.0,
        0.5,
        |scene| light(scene, "point").position.y,
        |scene, v| light_mut(scene, "point").position.y = v,
    );
    point.slider(
        "z",
        -2.0,
        4.0,
        0.5,
        |scene| light(scene, "point").position.z,
        |scene, v| light_mut(scene, "point").position.z = v,
    );
    point.toggle(
        "castShadow",
        |scene| light(scene, "point").cast_shadow,
        |scene, v| light_mut(scene, "point").cast_shadow = v,
    );
    point.color(
        "color",
        |scene| light(scene, "point").color,
        |scene, rgb| light_mut(scene, "point").color = rgb,
    );
}

fn light<'a>(scene: &'a Scene, name: &str) -> &'a Light {
    scene
        .root
        .find_light(name)
        .expect("panel bound to a light that is not in the graph")
}

fn light_mut<'a>(scene: &'a mut Scene, name: &str) -> &'a mut Light {
    scene
        .root
        .find_light_mut(name)
        .expect("panel bound to a light that is not in the graph")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::LightKind;
    use crate::ui::Control;

    fn composed() -> (Scene, ControlPanel) {
        let mut scene = create_scene(16.0 / 9.0);
        let mut panel = ControlPanel::new("Scene Controls");
        compose_scene(&mut scene, &mut panel);
        (scene, panel)
    }

    #[test]
    fn census_matches_the_demo() {
        let (scene, _) = composed();
        assert_eq!(scene.drawable_count(), 7);
        assert_eq!(scene.light_count(), 3);
        assert_eq!(scene.helper_count(), 3);
        assert_eq!(scene.ambient.intensity, 0.5);
        assert!(scene.ambient.visible);
        assert_eq!(scene.texture_loader.in_flight(), 4);
    }

    #[test]
    fn drawables_sit_where_expected() {
        let (scene, _) = composed();
        assert_eq!(scene.root.offset, Vector3::new(0.0, 0.5, 0.0));

        let ground = scene.root.find_drawable("ground").unwrap();
        assert_eq!(ground.position.y, -2.0);
        assert!(ground.receive_shadow);
        assert!(!ground.cast_shadow);

        let cube = scene.root.find_drawable("cube").unwrap();
        assert_eq!(cube.position.x, -2.0);
        assert_eq!(cube.material_id.as_deref(), Some("uv"));
        assert!(cube.cast_shadow);

        let teapot = scene.root.find_drawable("teapot").unwrap();
        assert_eq!((teapot.position.x, teapot.position.y), (-2.0, 1.5));

        let torus = scene.root.find_drawable("torus").unwrap();
        assert_eq!(torus.position, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn lights_match_the_demo() {
        let (scene, _) = composed();

        let sun = scene.root.directional_light().unwrap();
        assert_eq!(sun.position, Vector3::new(1.0, 2.0, 2.0));
        assert_eq!(sun.intensity, 0.5);
        assert!(sun.cast_shadow);

        let spot = scene.root.spot_light().unwrap();
        assert_eq!(spot.color, [0.0, 1.0, 0.0]);
        assert_eq!(spot.spot_angle(), Some(PI / 8.0));
        assert_eq!(spot.kind, LightKind::Spot { angle: PI / 8.0 });

        let point = scene.root.point_light().unwrap();
        assert_eq!(point.position, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(point.intensity, 1.0);
    }

    #[test]
    fn panel_has_all_folders() {
        let (_, panel) = composed();
        for label in [
            "Camera",
            "ambient light",
            "directional light",
            "spot light",
            "point light",
        ] {
            assert!(panel.find_folder(label).is_some(), "missing folder {label}");
        }

        // Only the camera group and its nested controls start expanded
        let camera = panel.find_folder("Camera").unwrap();
        assert!(camera.open_by_default);
        assert_eq!(camera.subfolders.len(), 1);
        assert!(camera.subfolders[0].open_by_default);
        assert!(!panel.find_folder("spot light").unwrap().open_by_default);
    }

    #[test]
    fn visibility_toggle_slaves_the_helper() {
        let (mut scene, panel) = composed();

        for folder_label in ["directional light", "spot light", "point light"] {
            let folder = panel.find_folder(folder_label).unwrap();
            let toggle = folder
                .controls
                .iter()
                .find_map(|c| match c {
                    Control::Toggle { label, get, set } if label == "visible" => Some((get, set)),
                    _ => None,
                })
                .expect("visible toggle");

            set_and_check(&mut scene, folder_label, toggle.1, false);
            assert!(!(toggle.0)(&scene));
            set_and_check(&mut scene, folder_label, toggle.1, true);
        }

        fn set_and_check(
            scene: &mut Scene,
            folder_label: &str,
            set: &crate::ui::panel::Setter<bool>,
            value: bool,
        ) {
            set(scene, value);
            let name = folder_label.trim_end_matches(" light");
            let l = scene.root.find_light(name).unwrap();
            assert_eq!(l.visible, value);
            assert_eq!(l.helper.visible, value);
        }
    }

    #[test]
    fn hidden_light_keeps_its_slider_value() {
        let (mut scene, _) = composed();
        let spot = scene.root.find_light_mut("spot").unwrap();
        spot.visible = false;
        assert_eq!(spot.intensity, 1.0);
        assert_eq!(spot.effective_intensity(), 0.0);
    }
}
