//! wgpu implementation of the loop's presenter

use std::sync::Arc;

use framestream_core::bridge::{FrameDimensions, FrameView};
use framestream_core::error::{FrameError, SetupError};
use framestream_core::presenter::Presenter;
use winit::window::Window;

use super::context::GpuContext;
use super::pipeline::QuadPipeline;
use super::shaders::ShaderSources;
use super::texture::FrameTexture;

/// Puts engine frames on a window surface as a textured quad
pub struct WgpuPresenter {
    context: GpuContext,
    pipeline: QuadPipeline,
    texture: FrameTexture,
}

impl WgpuPresenter {
    /// Set up the GPU side with the built-in quad shaders
    pub fn new(
        window: Arc<Window>,
        dimensions: FrameDimensions,
        vsync: bool,
    ) -> Result<Self, SetupError> {
        Self::with_shaders(window, dimensions, vsync, ShaderSources::default())
    }

    /// Set up the GPU side: context, shader program, quad geometry, texture
    pub fn with_shaders(
        window: Arc<Window>,
        dimensions: FrameDimensions,
        vsync: bool,
        sources: ShaderSources<'_>,
    ) -> Result<Self, SetupError> {
        let context = GpuContext::new(window, vsync)?;
        let pipeline = QuadPipeline::new(context.device(), context.surface_format(), sources)?;
        let texture =
            FrameTexture::new(context.device(), pipeline.bind_group_layout(), dimensions)?;

        Ok(Self {
            context,
            pipeline,
            texture,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }
}

impl Presenter for WgpuPresenter {
    fn upload(&mut self, frame: FrameView<'_>) -> Result<(), FrameError> {
        self.texture.upload(self.context.queue(), frame)
    }

    fn draw(&mut self) -> Result<(), FrameError> {
        let output = match self.context.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                // Recover for the next tick
                self.context.reconfigure();
                return Err(FrameError::PresentFailure(e.to_string()));
            }
            Err(e) => return Err(FrameError::PresentFailure(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.pipeline.draw(&mut pass, self.texture.bind_group());
        }

        self.context.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
