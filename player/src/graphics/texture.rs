//! Frame texture that receives engine output

use framestream_core::bridge::{FrameDimensions, FrameView};
use framestream_core::error::{FrameError, SetupError};

/// Pixel format of engine frames
pub const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// RGBA8 texture of fixed size, sampled with linear filtering
///
/// Allocated once at setup; every later upload overwrites the full contents
/// without changing size or format.
pub struct FrameTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    dimensions: FrameDimensions,
}

impl FrameTexture {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        dimensions: FrameDimensions,
    ) -> Result<Self, SetupError> {
        let max = device.limits().max_texture_dimension_2d;
        if dimensions.width() > max || dimensions.height() > max {
            return Err(SetupError::GpuContextUnavailable(format!(
                "frame size {}x{} exceeds the device texture limit of {}",
                dimensions.width(),
                dimensions.height(),
                max
            )));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: extent(dimensions),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        tracing::debug!(
            "Frame texture allocated: {}x{} {:?}",
            dimensions.width(),
            dimensions.height(),
            FRAME_FORMAT
        );

        Ok(Self {
            texture,
            bind_group,
            dimensions,
        })
    }

    /// Replace the texture contents with `frame`
    pub fn upload(&self, queue: &wgpu::Queue, frame: FrameView<'_>) -> Result<(), FrameError> {
        if frame.dimensions() != self.dimensions {
            return Err(FrameError::BufferSizeMismatch {
                offset: 0,
                expected: self.dimensions.byte_len(),
                available: frame.len(),
            });
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.dimensions.bytes_per_row()),
                rows_per_image: Some(self.dimensions.height()),
            },
            extent(self.dimensions),
        );
        Ok(())
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn extent(dimensions: FrameDimensions) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: dimensions.width(),
        height: dimensions.height(),
        depth_or_array_layers: 1,
    }
}
