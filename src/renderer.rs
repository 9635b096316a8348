use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::error::{Result, ViewerError};
use crate::panel::PanelFrame;
use crate::scene::{NodeKind, SceneGraph};
use crate::traits::Renderer;
use crate::types::{unit_cube, CameraUniform, LightsUniform, MeshUniform, Vertex};

/// Meshes drawn per frame; the rest are skipped with a warning
pub const MAX_MESHES: usize = 64;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Rasterizing renderer: lit boxes with a depth buffer, plus the egui overlay
pub struct MeshRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    mesh_buffer: wgpu::Buffer,
    mesh_bind_group: wgpu::BindGroup,
    mesh_stride: u64,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<PanelFrame>,
}

impl MeshRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ViewerError::Render(e.to_string()))?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size)?;
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &surface_config);
        }
        log::info!(
            "surface {}x{} format {:?}",
            size.width,
            size.height,
            surface_config.format
        );

        let depth_view = Self::create_depth_view(&device, size);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[Camera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::from_scene(&SceneGraph::new())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let mesh_stride = (std::mem::size_of::<MeshUniform>() as u64).div_ceil(alignment) * alignment;
        let mesh_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Buffer"),
            size: mesh_stride * MAX_MESHES as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT, false),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT, false),
            ],
        });
        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                true,
            )],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });
        let mesh_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &mesh_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &mesh_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniform>() as u64),
                }),
            }],
        });

        let pipeline = Self::create_pipeline(
            &device,
            surface_config.format,
            &[&frame_layout, &mesh_layout],
        );

        let (vertices, indices) = unit_cube();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            size,
            depth_view,
            pipeline,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            mesh_buffer,
            mesh_bind_group,
            mesh_stride,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            egui_renderer,
            overlay: None,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::Render(format!("Failed to find appropriate adapter: {:?}", e)))
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| ViewerError::Render(format!("Failed to create device: {:?}", e)))
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let fallback = *surface_caps
            .formats
            .first()
            .ok_or_else(|| ViewerError::Render("surface reports no formats".to_string()))?;
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(fallback);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Queue panel output to be drawn over the next frame
    pub fn queue_overlay(&mut self, frame: PanelFrame) {
        self.overlay = Some(frame);
    }

    /// Write one uniform slot per mesh, in traversal order
    fn upload_meshes(&self, scene: &SceneGraph) -> u32 {
        let mut count = 0usize;
        for node in scene.all_nodes() {
            let NodeKind::Mesh(mesh) = &node.kind else {
                continue;
            };
            if count == MAX_MESHES {
                log::warn!("skipping mesh {}: {} meshes already queued", node.id(), MAX_MESHES);
                continue;
            }
            let uniform = MeshUniform::new(node, mesh);
            self.queue.write_buffer(
                &self.mesh_buffer,
                count as u64 * self.mesh_stride,
                bytemuck::cast_slice(&[uniform]),
            );
            count += 1;
        }
        count as u32
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &PanelFrame,
    ) {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: frame.pixels_per_point,
        };
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &frame.primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &frame.primitives, &screen_descriptor);
        }

        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl Renderer for MeshRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = winit::dpi::PhysicalSize::new(width, height);
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&self.device, self.size);
    }

    fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(());
        }

        let camera_uniform: CameraUniform = camera.to_uniform();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));
        self.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::cast_slice(&[LightsUniform::from_scene(scene)]),
        );
        let mesh_count = self.upload_meshes(scene);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                return match SurfaceAction::for_error(e) {
                    SurfaceAction::Reconfigure => {
                        log::warn!("surface outdated, reconfiguring and skipping frame");
                        self.surface.configure(&self.device, &self.surface_config);
                        Ok(())
                    }
                    SurfaceAction::Skip => {
                        log::warn!("surface timeout, skipping frame");
                        Ok(())
                    }
                    SurfaceAction::Fail(e) => Err(e),
                }
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            for slot in 0..mesh_count {
                let offset = (slot as u64 * self.mesh_stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(1, &self.mesh_bind_group, &[offset]);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        if let Some(frame) = self.overlay.take() {
            self.draw_overlay(&mut encoder, &view, &frame);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// How a failed `get_current_texture` is handled
#[derive(Debug)]
pub enum SurfaceAction {
    /// Surface no longer matches the window; configure again and skip the frame
    Reconfigure,
    /// Skip the frame and keep going
    Skip,
    Fail(ViewerError),
}

impl SurfaceAction {
    pub fn for_error(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
            wgpu::SurfaceError::Timeout => SurfaceAction::Skip,
            wgpu::SurfaceError::Lost => SurfaceAction::Fail(ViewerError::SurfaceLost),
            other => SurfaceAction::Fail(ViewerError::Render(other.to_string())),
        }
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: None,
        },
        count: None,
    }
}
