//! wgpu render engine
//!
//! Owns the surface, device, and the three pipelines the demo needs: a
//! shadow depth pass for the directional light, the forward-lit mesh pass,
//! and an unlit line pass for the light helpers. UI overlays render through
//! a callback at the end of the frame.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        material::material_bind_group_layout,
        texture_resource::TextureResource,
    },
    scene::{drawable::model_bind_group_layout, Scene},
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager, VertexKind};

const SHADOW_MAP_SIZE: u32 = 2048;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,

    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    model_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Panics
    /// Panics if no compatible adapter or device is available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request a device!");

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map = TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");

        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let model_layout = model_bind_group_layout(&device);
        let material_layout = material_bind_group_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow.wgsl"));
        pipeline_manager.load_shader("helper", include_str!("helper.wgsl"));

        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::new("shadow")
                .with_label("Shadow Depth Pass")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                // Both faces into the shadow map, avoids peter-panning on thin geometry
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().layout.clone(),
                    model_layout.layout.clone(),
                ])
                .with_vertex_only(),
        );

        pipeline_manager.register_pipeline(
            "Mesh",
            PipelineConfig::new("scene")
                .with_label("Forward Mesh Pass")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_target(format)
                // Hand-built primitives keep interiors visible (open cones, the ground seen from below)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().layout.clone(),
                    model_layout.layout.clone(),
                    material_layout.layout.clone(),
                    shadow_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            "Helper",
            PipelineConfig::new("helper")
                .with_label("Light Helper Pass")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_target(format)
                .with_cull_mode(None)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_vertex_kind(VertexKind::Helper)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().layout.clone(),
                    model_layout.layout.clone(),
                ]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{}", error);
            }
            panic!("Failed to create render pipelines");
        }

        RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            model_layout,
            material_layout,
            shadow_map,
            shadow_bind_group,
        }
    }

    /// Per-frame CPU and GPU state sync, call before `render_frame`
    pub fn prepare(&mut self, scene: &mut Scene) {
        scene.update();
        scene.sync_gpu(
            &self.device,
            &self.queue,
            &self.model_layout,
            &self.material_layout,
        );
        update_global_ubo(&mut self.global_ubo, &self.queue, scene);
    }

    /// Renders a frame with an optional UI overlay callback
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("failed to acquire surface texture: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow depth from the directional light
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let sun_casts = scene
                .root
                .directional_light()
                .map(|sun| sun.visible && sun.cast_shadow)
                .unwrap_or(false);

            if sun_casts {
                if let Some(pipeline) = self.pipeline_manager.get_pipeline("Shadow") {
                    shadow_pass.set_pipeline(pipeline);
                    shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                    for drawable in &scene.root.drawables {
                        if !(drawable.visible && drawable.cast_shadow) {
                            continue;
                        }
                        if let Some(gpu) = &drawable.gpu {
                            shadow_pass.set_bind_group(1, &gpu.bind_group, &[]);
                            shadow_pass.set_vertex_buffer(0, gpu.mesh.vertex_buffer.slice(..));
                            shadow_pass.set_index_buffer(
                                gpu.mesh.index_buffer.slice(..),
                                wgpu::IndexFormat::Uint32,
                            );
                            shadow_pass.draw_indexed(0..gpu.mesh.index_count, 0, 0..1);
                        }
                    }
                }
            }
        }

        // PASS 2: lit meshes, then helper lines in the same pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("Mesh") {
                render_pass.set_pipeline(pipeline);

                for drawable in &scene.root.drawables {
                    if !drawable.visible {
                        continue;
                    }
                    let material = scene
                        .material_manager
                        .get_for_drawable(drawable.material_id.as_ref());
                    let (Some(gpu), Some(material_bind_group)) =
                        (&drawable.gpu, material.bind_group())
                    else {
                        continue;
                    };

                    render_pass.set_bind_group(1, &gpu.bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, gpu.mesh.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        gpu.mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..gpu.mesh.index_count, 0, 0..1);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("Helper") {
                render_pass.set_pipeline(pipeline);

                for light in &scene.root.lights {
                    if !light.helper.visible {
                        continue;
                    }
                    if let Some(gpu) = &light.helper.gpu {
                        render_pass.set_bind_group(1, &gpu.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                        render_pass.set_index_buffer(
                            gpu.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
                    }
                }
            }
        }

        // PASS 3: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the surface and recreates the depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
