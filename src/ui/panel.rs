// src/ui/panel.rs
//! Debug control panel
//!
//! A declarative property sheet: folders of typed controls, each bound to
//! scene state through getter and setter closures. The panel never stores
//! values itself, every frame it reads the live scene, shows the widget,
//! and writes edits straight back. Slider edits snap to their configured
//! step, measured from the range minimum.

use crate::gfx::scene::Scene;

pub type Getter<T> = Box<dyn Fn(&Scene) -> T>;
pub type Setter<T> = Box<dyn Fn(&mut Scene, T)>;

/// Converts between scene-side color state and the panel's RGB triple
pub struct ColorAdapter {
    pub read: Getter<[f32; 3]>,
    pub write: Setter<[f32; 3]>,
}

/// A single bound widget
pub enum Control {
    Slider {
        label: String,
        min: f32,
        max: f32,
        step: f32,
        get: Getter<f32>,
        set: Setter<f32>,
    },
    Toggle {
        label: String,
        get: Getter<bool>,
        set: Setter<bool>,
    },
    Color {
        label: String,
        adapter: ColorAdapter,
    },
}

/// Snaps a slider value to the folder's step grid, anchored at `min`
pub fn apply_step(min: f32, max: f32, step: f32, value: f32) -> f32 {
    let snapped = if step > 0.0 {
        min + ((value - min) / step).round() * step
    } else {
        value
    };
    snapped.clamp(min, max)
}

/// A collapsible group of controls, optionally with nested sub-groups
///
/// Folders start collapsed unless marked open, only the camera group is
/// expanded when the panel first shows.
pub struct Folder {
    pub label: String,
    pub controls: Vec<Control>,
    pub subfolders: Vec<Folder>,
    pub open_by_default: bool,
}

impl Folder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            controls: Vec::new(),
            subfolders: Vec::new(),
            open_by_default: false,
        }
    }

    /// Marks this folder as expanded when the panel first shows
    pub fn open(&mut self) -> &mut Self {
        self.open_by_default = true;
        self
    }

    /// Adds a nested sub-group and returns a handle to it
    pub fn subfolder(&mut self, label: &str) -> &mut Folder {
        self.subfolders.push(Folder::new(label));
        self.subfolders.last_mut().unwrap()
    }

    pub fn slider(
        &mut self,
        label: &str,
        min: f32,
        max: f32,
        step: f32,
        get: impl Fn(&Scene) -> f32 + 'static,
        set: impl Fn(&mut Scene, f32) + 'static,
    ) -> &mut Self {
        self.controls.push(Control::Slider {
            label: label.to_string(),
            min,
            max,
            step,
            get: Box::new(get),
            set: Box::new(set),
        });
        self
    }

    pub fn toggle(
        &mut self,
        label: &str,
        get: impl Fn(&Scene) -> bool + 'static,
        set: impl Fn(&mut Scene, bool) + 'static,
    ) -> &mut Self {
        self.controls.push(Control::Toggle {
            label: label.to_string(),
            get: Box::new(get),
            set: Box::new(set),
        });
        self
    }

    pub fn color(
        &mut self,
        label: &str,
        read: impl Fn(&Scene) -> [f32; 3] + 'static,
        write: impl Fn(&mut Scene, [f32; 3]) + 'static,
    ) -> &mut Self {
        self.controls.push(Control::Color {
            label: label.to_string(),
            adapter: ColorAdapter {
                read: Box::new(read),
                write: Box::new(write),
            },
        });
        self
    }
}

/// The debug panel: a titled window of folders
pub struct ControlPanel {
    pub title: String,
    pub folders: Vec<Folder>,
}

impl ControlPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            folders: Vec::new(),
        }
    }

    /// Adds a folder and returns a handle for binding controls to it
    pub fn folder(&mut self, label: &str) -> &mut Folder {
        self.folders.push(Folder::new(label));
        self.folders.last_mut().unwrap()
    }

    pub fn find_folder(&self, label: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.label == label)
    }

    /// Builds the panel for this frame, writing any edits into the scene
    pub fn draw(&self, ui: &imgui::Ui, scene: &mut Scene) {
        ui.window(&self.title)
            .size([320.0, 560.0], imgui::Condition::FirstUseEver)
            .position([16.0, 16.0], imgui::Condition::FirstUseEver)
            .build(|| {
                for folder in &self.folders {
                    let flags = if folder.open_by_default {
                        imgui::TreeNodeFlags::DEFAULT_OPEN
                    } else {
                        imgui::TreeNodeFlags::empty()
                    };
                    if !ui.collapsing_header(&folder.label, flags) {
                        continue;
                    }
                    let _id = ui.push_id(folder.label.as_str());
                    Self::draw_controls(ui, scene, &folder.controls);
                    for subfolder in &folder.subfolders {
                        let node = ui
                            .tree_node_config(subfolder.label.as_str())
                            .default_open(subfolder.open_by_default)
                            .push();
                        if node.is_some() {
                            Self::draw_controls(ui, scene, &subfolder.controls);
                        }
                    }
                }
            });
    }

    fn draw_controls(ui: &imgui::Ui, scene: &mut Scene, controls: &[Control]) {
        for control in controls {
            match control {
                Control::Slider {
                    label,
                    min,
                    max,
                    step,
                    get,
                    set,
                } => {
                    let mut value = get(scene);
                    if ui.slider(label, *min, *max, &mut value) {
                        set(scene, apply_step(*min, *max, *step, value));
                    }
                }
                Control::Toggle { label, get, set } => {
                    let mut value = get(scene);
                    if ui.checkbox(label, &mut value) {
                        set(scene, value);
                    }
                }
                Control::Color { label, adapter } => {
                    let mut value = (adapter.read)(scene);
                    if ui.color_edit3(label, &mut value) {
                        (adapter.write)(scene, value);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::TargetCamera;
    use crate::gfx::scene::Light;
    use cgmath::Vector3;

    fn test_scene() -> Scene {
        let mut scene = Scene::new(TargetCamera::new(Vector3::new(0.0, 0.0, 32.0), 1.0));
        scene
            .root
            .add_light(Light::directional("sun", [1.0, 1.0, 1.0], 0.5));
        scene
    }

    #[test]
    fn step_snaps_from_range_min() {
        assert_eq!(apply_step(0.0, 1.0, 0.25, 0.4), 0.5);
        assert_eq!(apply_step(0.0, 1.0, 0.25, 0.3), 0.25);
        assert_eq!(apply_step(1.0, 4.0, 0.5, 2.7), 2.5);
        // Zero step passes through
        assert_eq!(apply_step(0.0, 1.0, 0.0, 0.37), 0.37);
        // Snapping never escapes the range
        assert_eq!(apply_step(0.0, 1.0, 0.3, 0.99), 0.9);
    }

    #[test]
    fn slider_binding_writes_exact_value() {
        let mut panel = ControlPanel::new("debug");
        panel.folder("directional light").slider(
            "intensity",
            0.0,
            1.0,
            0.25,
            |scene| scene.root.directional_light().unwrap().intensity,
            |scene, value| scene.root.find_light_mut("sun").unwrap().intensity = value,
        );

        let mut scene = test_scene();
        let folder = panel.find_folder("directional light").unwrap();
        let Control::Slider { get, set, min, max, step, .. } = &folder.controls[0] else {
            panic!("expected slider");
        };

        assert_eq!(get(&scene), 0.5);
        set(&mut scene, apply_step(*min, *max, *step, 0.6));
        assert_eq!(get(&scene), 0.5);
        set(&mut scene, apply_step(*min, *max, *step, 0.7));
        assert_eq!(get(&scene), 0.75);
    }

    #[test]
    fn color_adapter_round_trips() {
        let mut panel = ControlPanel::new("debug");
        panel.folder("directional light").color(
            "color",
            |scene| scene.root.directional_light().unwrap().color,
            |scene, rgb| scene.root.find_light_mut("sun").unwrap().color = rgb,
        );

        let mut scene = test_scene();
        let folder = panel.find_folder("directional light").unwrap();
        let Control::Color { adapter, .. } = &folder.controls[0] else {
            panic!("expected color control");
        };

        (adapter.write)(&mut scene, [0.25, 0.5, 0.75]);
        assert_eq!((adapter.read)(&scene), [0.25, 0.5, 0.75]);
        assert_eq!(
            scene.root.directional_light().unwrap().color,
            [0.25, 0.5, 0.75]
        );
    }

    #[test]
    fn toggle_binding_flips_state() {
        let mut panel = ControlPanel::new("debug");
        panel.folder("directional light").toggle(
            "visible",
            |scene| scene.root.directional_light().unwrap().visible,
            |scene, value| scene.root.find_light_mut("sun").unwrap().visible = value,
        );

        let mut scene = test_scene();
        let folder = panel.find_folder("directional light").unwrap();
        let Control::Toggle { get, set, .. } = &folder.controls[0] else {
            panic!("expected toggle");
        };

        assert!(get(&scene));
        set(&mut scene, false);
        assert!(!get(&scene));
        assert_eq!(scene.root.directional_light().unwrap().effective_intensity(), 0.0);
    }
}
