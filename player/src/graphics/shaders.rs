//! WGSL sources for the textured quad
//!
//! The two stages are kept as separate sources and checked against each
//! other before any GPU work happens (see [`super::shader`]).

/// Pass-through vertex stage: clip-space position in, texture coordinate out
pub const QUAD_VERTEX_SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
}

@vertex
fn vs_main(
    @location(0) position: vec2<f32>,
    @location(1) tex_coord: vec2<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    out.tex_coord = tex_coord;
    return out;
}
"#;

/// Samples the frame texture at the interpolated coordinate
pub const QUAD_FRAGMENT_SHADER: &str = r#"
@group(0) @binding(0) var frame_texture: texture_2d<f32>;
@group(0) @binding(1) var frame_sampler: sampler;

@fragment
fn fs_main(@location(0) tex_coord: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(frame_texture, frame_sampler, tex_coord);
}
"#;

/// A vertex/fragment source pair
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

impl Default for ShaderSources<'static> {
    fn default() -> Self {
        Self {
            vertex: QUAD_VERTEX_SHADER,
            fragment: QUAD_FRAGMENT_SHADER,
        }
    }
}
