use crate::constants::{AMBIENT, CLEAR_COLOR, LIGHT_DIR};
use crate::mesh::{cube_vertices, InstanceBatch, InstanceRaw, QUAD_VERTICES};
use shelf_core::scene::SceneGraph;
use shelf_core::Camera;
use web_sys as web;

mod helpers;
mod pipeline;

use pipeline::{create_scene_resources, Globals, SceneResources};

pub(crate) static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: SceneResources,

    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    quad_vb: wgpu::Buffer,
    cube_vb: wgpu::Buffer,
    cube_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    batch: InstanceBatch,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene = create_scene_resources(&device, format);
        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let quad_vb =
            helpers::create_vertex_buffer(&device, "quad_vb", bytemuck::cast_slice(&QUAD_VERTICES));
        let cube = cube_vertices();
        let cube_vb = helpers::create_vertex_buffer(&device, "cube_vb", bytemuck::cast_slice(&cube));

        let instance_capacity = 64;
        let instance_buffer = helpers::create_instance_buffer(
            &device,
            instance_capacity,
            std::mem::size_of::<InstanceRaw>(),
        );

        log::info!("[gpu] surface {width}x{height} {format:?}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene,
            depth_tex,
            depth_view,
            quad_vb,
            cube_vb,
            cube_vertex_count: cube.len() as u32,
            instance_buffer,
            instance_capacity,
            batch: InstanceBatch::default(),
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: CLEAR_COLOR[3],
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            self.depth_tex.destroy();
            let (tex, view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_tex = tex;
            self.depth_view = view;
        }
    }

    pub fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        self.batch.fill(scene);
        self.upload_instances();

        let globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            light: [LIGHT_DIR[0], LIGHT_DIR[1], LIGHT_DIR[2], AMBIENT],
        };
        self.queue
            .write_buffer(&self.scene.uniform_buffer, 0, bytemuck::bytes_of(&globals));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.scene.pipeline);
            rpass.set_bind_group(0, &self.scene.bind_group, &[]);
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let planes = self.batch.planes.len() as u32;
            let boxes = self.batch.boxes.len() as u32;
            if planes > 0 {
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.draw(0..QUAD_VERTICES.len() as u32, 0..planes);
            }
            if boxes > 0 {
                rpass.set_vertex_buffer(0, self.cube_vb.slice(..));
                rpass.draw(0..self.cube_vertex_count, planes..planes + boxes);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn upload_instances(&mut self) {
        let needed = self.batch.len();
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer = helpers::create_instance_buffer(
                &self.device,
                self.instance_capacity,
                std::mem::size_of::<InstanceRaw>(),
            );
            log::debug!("[gpu] instance buffer grown to {}", self.instance_capacity);
        }
        if !self.batch.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, &self.batch.to_bytes());
        }
    }
}
