//! GPU side of the renderer: one alpha-blended triangle-list pipeline fed
//! from a vertex buffer that is rewritten every frame.
//!
//! The scene is built in world pixels (see `shapes`); this module owns the
//! mapping onto the surface and nothing else.

use super::vertex::Vertex;
use crate::sim::Viewport;

/// Smallest vertex buffer we allocate, in vertices
const MIN_VERTEX_CAPACITY: usize = 1024;

const VERTEX_SIZE: wgpu::BufferAddress = std::mem::size_of::<Vertex>() as wgpu::BufferAddress;

/// Map world pixels (origin top-left, y down) into NDC (-1..1, y up)
pub fn world_to_ndc(world: &Viewport, x: f32, y: f32) -> (f32, f32) {
    (x / world.width * 2.0 - 1.0, 1.0 - y / world.height * 2.0)
}

fn scene_to_ndc(world: &Viewport, vertices: &[Vertex]) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let (x, y) = world_to_ndc(world, v.position[0], v.position[1]);
            Vertex::new(x, y, v.color)
        })
        .collect()
}

/// Capacity for a buffer that must hold `needed` vertices; never shrinks
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(MIN_VERTEX_CAPACITY)
    }
}

fn sky(clear: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: clear[0] as f64,
        g: clear[1] as f64,
        b: clear[2] as f64,
        a: clear[3] as f64,
    }
}

/// Canvas surface, device and the scene pipeline
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    /// Vertices the scene buffer can hold
    capacity: usize,
    /// Game world (CSS pixels) stretched over the surface
    world: Viewport,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        world: Viewport,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bike-sim device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        // Colors in `vertex::colors` are authored for an sRGB target
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = Self::scene_pipeline(&device, format);
        let capacity = MIN_VERTEX_CAPACITY;
        let scene_buffer = Self::scene_buffer(&device, capacity);

        log::info!(
            "Renderer ready ({:?}, {}x{} px for a {}x{} world)",
            format,
            config.width,
            config.height,
            world.width,
            world.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene_buffer,
            capacity,
            world,
        })
    }

    fn scene_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        // Road layers cross-fade and headlights glow, hence alpha blending;
        // draw order is back to front so no depth buffer
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn scene_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene vertices"),
            size: capacity as wgpu::BufferAddress * VERTEX_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// New canvas size and world; a zero-sized canvas keeps the old surface
    pub fn resize(&mut self, width: u32, height: u32, world: Viewport) {
        self.world = world;
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Copy the frame's vertices to the GPU, growing the buffer if needed
    fn upload(&mut self, vertices: &[Vertex]) {
        let capacity = grown_capacity(self.capacity, vertices.len());
        if capacity != self.capacity {
            log::debug!("Scene buffer {} -> {} vertices", self.capacity, capacity);
            self.scene_buffer = Self::scene_buffer(&self.device, capacity);
            self.capacity = capacity;
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Draw one frame over a `clear` sky
    pub fn render(&mut self, vertices: &[Vertex], clear: [f32; 4]) -> Result<(), wgpu::SurfaceError> {
        let ndc = scene_to_ndc(&self.world, vertices);
        self.upload(&ndc);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(sky(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !ndc.is_empty() {
                let bytes = ndc.len() as wgpu::BufferAddress * VERTEX_SIZE;
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.scene_buffer.slice(..bytes));
                pass.draw(0..ndc.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
