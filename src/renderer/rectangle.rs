//! Batched flat-color rectangle renderer.
//!
//! Everything the game draws is a filled rectangle: the player box and the
//! platform geometry. Rectangles queued during a frame are uploaded as one
//! vertex/index buffer pair and drawn with a single indexed draw call.

use std::mem;

use wgpu::{
    self, BlendState, BufferUsages, ColorTargetState, ColorWrites, Device, FragmentState,
    MultisampleState, PrimitiveState, RenderPass, RenderPipeline, VertexAttribute,
    VertexBufferLayout, VertexFormat, VertexState, util::DeviceExt,
};

use crate::math::Rect;

/// Per-vertex data for rectangle rendering.
///
/// `#[repr(C)]` keeps the memory layout stable for the GPU buffer; the
/// position is already in normalized device coordinates when the vertex is
/// built.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    /// Position in normalized device coordinates (-1.0 to 1.0).
    position: [f32; 2],
    /// RGBA color (0.0 to 1.0).
    color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout matching `shaders/rectangle.wgsl`.
    fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x2,
                },
                VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Renders the frame's rectangles in one draw call.
pub struct RectangleRenderer {
    render_pipeline: RenderPipeline,
    /// Rectangles queued for the current frame, in screen pixels.
    rectangles: Vec<(Rect, [f32; 4])>,
    window_width: f32,
    window_height: f32,
}

impl RectangleRenderer {
    /// Creates the rectangle pipeline for the given surface format.
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rectangle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rectangle.wgsl").into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Rectangle Pipeline Layout"),
                bind_group_layouts: &[],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rectangle Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            rectangles: Vec::new(),
            window_width: 1360.0,
            window_height: 768.0,
        }
    }

    /// Queues a screen-space rectangle for the current frame.
    pub fn add_rectangle(&mut self, rect: Rect, color: [f32; 4]) {
        self.rectangles.push((rect, color));
    }

    /// Drops all queued rectangles. Called at the start of each frame.
    pub fn clear_rectangles(&mut self) {
        self.rectangles.clear();
    }

    /// Updates the window dimensions used for the screen-to-NDC transform.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Draws all queued rectangles into `render_pass`.
    pub fn render(&mut self, device: &Device, render_pass: &mut RenderPass) {
        if self.rectangles.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);

        let mut all_vertices = Vec::with_capacity(self.rectangles.len() * 4);
        let mut all_indices = Vec::with_capacity(self.rectangles.len() * 6);

        for (rect_index, (rect, color)) in self.rectangles.iter().enumerate() {
            // Screen space: (0,0) = top-left, positive Y down.
            // NDC space: (-1,-1) = bottom-left, (1,1) = top-right.
            let x = (rect.x / self.window_width) * 2.0 - 1.0;
            let y = 1.0 - (rect.y / self.window_height) * 2.0;
            let width = (rect.w / self.window_width) * 2.0;
            let height = -(rect.h / self.window_height) * 2.0;

            let vertices = [
                Vertex {
                    position: [x, y],
                    color: *color,
                },
                Vertex {
                    position: [x + width, y],
                    color: *color,
                },
                Vertex {
                    position: [x + width, y + height],
                    color: *color,
                },
                Vertex {
                    position: [x, y + height],
                    color: *color,
                },
            ];
            all_vertices.extend_from_slice(&vertices);

            // Two triangles per rectangle: (0,1,2) and (0,2,3).
            let base_index = (rect_index * 4) as u16;
            let indices = [
                base_index,
                base_index + 1,
                base_index + 2,
                base_index,
                base_index + 2,
                base_index + 3,
            ];
            all_indices.extend_from_slice(&indices);
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rectangle Vertex Buffer"),
            contents: bytemuck::cast_slice(&all_vertices),
            usage: BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rectangle Index Buffer"),
            contents: bytemuck::cast_slice(&all_indices),
            usage: BufferUsages::INDEX,
        });

        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..all_indices.len() as u32, 0, 0..1);
    }
}
