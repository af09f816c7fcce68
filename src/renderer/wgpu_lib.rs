//! WGPU-based drawing backend.
//!
//! This module provides [`WgpuRenderer`], which owns the surface, device,
//! queue, and the batched rectangle pipeline, and implements [`DrawTarget`]
//! so the session can draw frames into it. A frame begins when the session
//! calls `clear` (which acquires the swapchain texture), accumulates
//! rectangles, and ends with `present` (one render pass, one submit).

use wgpu;

use crate::error::GameError;
use crate::math::Rect;
use crate::renderer::DrawTarget;
use crate::renderer::rectangle::RectangleRenderer;

/// WGPU surface, device, and pipeline state for the game window.
pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Batched rectangle pipeline; everything the game draws goes here.
    pub rectangle_renderer: RectangleRenderer,
    /// Swapchain texture acquired by `clear`, consumed by `present`.
    frame: Option<wgpu::SurfaceTexture>,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    /// Initializes the adapter, device, surface configuration, and the
    /// rectangle pipeline.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Self {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .expect("Failed to find an appropriate adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let swapchain_capabilities = surface.get_capabilities(&adapter);
        let swapchain_format = swapchain_capabilities
            .formats
            .first()
            .copied()
            .expect("surface reports no supported texture formats");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: swapchain_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: swapchain_capabilities.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let mut rectangle_renderer = RectangleRenderer::new(&device, swapchain_format);
        rectangle_renderer.resize(width as f32, height as f32);

        Self {
            surface,
            device,
            queue,
            surface_config,
            rectangle_renderer,
            frame: None,
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Reconfigures the surface after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.rectangle_renderer.resize(width as f32, height as f32);
    }
}

impl DrawTarget for WgpuRenderer {
    fn size(&self) -> (f32, f32) {
        (
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        )
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<(), GameError> {
        let frame = self
            .surface
            .get_current_texture()
            .map_err(|err| GameError::Render(format!("could not acquire frame: {err}")))?;
        self.frame = Some(frame);
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
        self.rectangle_renderer.clear_rectangles();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: [f32; 4]) -> Result<(), GameError> {
        if self.frame.is_none() {
            return Err(GameError::Render(
                "fill_rect called before clear".to_string(),
            ));
        }
        self.rectangle_renderer.add_rectangle(rect, color);
        Ok(())
    }

    fn present(&mut self) -> Result<(), GameError> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| GameError::Render("present called before clear".to_string()))?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.rectangle_renderer
                .render(&self.device, &mut render_pass);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
