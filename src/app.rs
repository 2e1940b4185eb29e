//! Application bootstrapper
//!
//! Owns the winit event loop, the window, the render engine, and the debug
//! UI, and drives the per-frame flow: the panel mutates the scene during
//! `update_logic`, then the renderer takes the scene immutably.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    compose::{compose_scene, create_scene},
    gfx::{rendering::RenderEngine, scene::Scene},
    ui::{ControlPanel, UiManager},
};

const INITIAL_WIDTH: u32 = 1200;
const INITIAL_HEIGHT: u32 = 800;

pub struct SceneApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    panel: ControlPanel,
}

impl SceneApp {
    /// Creates the application with an empty scene and panel
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        let scene = create_scene(INITIAL_WIDTH as f32 / INITIAL_HEIGHT as f32);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                panel: ControlPanel::new("Scene Controls"),
            },
        })
    }

    /// Creates the application with the demo scene already composed
    pub fn with_demo_scene() -> anyhow::Result<Self> {
        let mut app = Self::new()?;
        compose_scene(&mut app.app_state.scene, &mut app.app_state.panel);
        Ok(app)
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.app_state.panel
    }

    /// Runs the event loop; returns when the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .expect("event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(
            WindowAttributes::default()
                .with_title("scenelab")
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT)),
        ) {
            Ok(window) => {
                let window_handle = Arc::new(window);
                self.window = Some(window_handle.clone());

                let (width, height) = window_handle.inner_size().into();

                let window_clone = window_handle.clone();
                let render_engine = pollster::block_on(async move {
                    RenderEngine::new(window_clone, width, height).await
                });

                let mut ui_manager = UiManager::new(
                    render_engine.device(),
                    render_engine.queue(),
                    render_engine.surface_format(),
                    &window_handle,
                );
                ui_manager.update_display_size(width, height);

                self.scene.camera.resize_projection(width, height);
                self.ui_manager = Some(ui_manager);
                self.render_engine = Some(render_engine);
            }
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.camera.resize_projection(width, height);
                render_engine.resize(width, height);
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                // Build the UI first, edits land in the scene before the
                // renderer snapshots it
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let scene = &mut self.scene;
                    let panel = &self.panel;
                    ui_manager.update_logic(window, |ui| {
                        panel.draw(ui, scene);
                    });
                }

                render_engine.prepare(&mut self.scene);

                let ui_manager = self.ui_manager.as_mut();
                render_engine.render_frame(
                    &self.scene,
                    ui_manager.map(|ui_manager| {
                        move |device: &wgpu::Device,
                              queue: &wgpu::Queue,
                              encoder: &mut wgpu::CommandEncoder,
                              color_attachment: &wgpu::TextureView| {
                            ui_manager.render_display_only(
                                device,
                                queue,
                                encoder,
                                color_attachment,
                            );
                        }
                    }),
                );
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
