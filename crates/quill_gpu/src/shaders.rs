//! WGSL shaders for ink compositing
//!
//! Every shader draws a full-target quad (six vertices, no vertex buffer)
//! and samples its inputs at the fragment's texel center. All inputs and
//! outputs are premultiplied alpha.
//!
//! Composite shaders share one bind group layout:
//! - `@binding(0)` sampler
//! - `@binding(1..=3)` input textures (unused slots are bound to a blank
//!   texture)

macro_rules! fullscreen_vertex {
    () => {
        r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );
    let c = corners[vertex_index];

    var out: VertexOutput;
    out.position = vec4<f32>(c.x * 2.0 - 1.0, 1.0 - c.y * 2.0, 0.0, 1.0);
    out.uv = c;
    return out;
}
"#
    };
}

macro_rules! composite_bindings {
    () => {
        r#"
@group(0) @binding(0) var input_sampler: sampler;
@group(0) @binding(1) var input_a: texture_2d<f32>;
@group(0) @binding(2) var input_b: texture_2d<f32>;
@group(0) @binding(3) var input_c: texture_2d<f32>;
"#
    };
}

/// Draw ink: `input_a` image, `input_b` mask tinted with the stroke color.
/// Source-over of the mask onto the image.
pub const DRAW_SHADER: &str = concat!(
    fullscreen_vertex!(),
    composite_bindings!(),
    r#"
@fragment
fn fs_draw(in: VertexOutput) -> @location(0) vec4<f32> {
    let image = textureSampleLevel(input_a, input_sampler, in.uv, 0.0);
    let mask = textureSampleLevel(input_b, input_sampler, in.uv, 0.0);
    return mask + image * (1.0 - mask.a);
}
"#
);

/// Blur ink: `input_a` sharp image, `input_b` blurred copy, `input_c` mask.
pub const BLUR_MIX_SHADER: &str = concat!(
    fullscreen_vertex!(),
    composite_bindings!(),
    r#"
@fragment
fn fs_blur_mix(in: VertexOutput) -> @location(0) vec4<f32> {
    let sharp = textureSampleLevel(input_a, input_sampler, in.uv, 0.0);
    let blurred = textureSampleLevel(input_b, input_sampler, in.uv, 0.0);
    let mask = textureSampleLevel(input_c, input_sampler, in.uv, 0.0);
    return mix(sharp, blurred, mask.a);
}
"#
);

/// Erase ink: `input_a` current image, `input_b` clear reference, `input_c`
/// mask. Reveals the reference under the stroke.
pub const ERASE_SHADER: &str = concat!(
    fullscreen_vertex!(),
    composite_bindings!(),
    r#"
@fragment
fn fs_erase(in: VertexOutput) -> @location(0) vec4<f32> {
    let current = textureSampleLevel(input_a, input_sampler, in.uv, 0.0);
    let clear = textureSampleLevel(input_b, input_sampler, in.uv, 0.0);
    let mask = textureSampleLevel(input_c, input_sampler, in.uv, 0.0);
    return mix(current, clear, mask.a);
}
"#
);

/// One direction of a separable Gaussian blur
pub const GAUSSIAN_BLUR_SHADER: &str = concat!(
    fullscreen_vertex!(),
    r#"
struct BlurUniforms {
    direction: vec2<f32>,
    sigma: f32,
    radius: u32,
}

@group(0) @binding(0) var<uniform> params: BlurUniforms;
@group(0) @binding(1) var input_texture: texture_2d<f32>;
@group(0) @binding(2) var input_sampler: sampler;

@fragment
fn fs_gaussian(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = params.direction / vec2<f32>(textureDimensions(input_texture, 0));
    let two_sigma_sq = 2.0 * params.sigma * params.sigma;

    var sum = textureSampleLevel(input_texture, input_sampler, in.uv, 0.0);
    var weight_sum = 1.0;
    for (var i = 1u; i <= params.radius; i = i + 1u) {
        let offset = f32(i);
        let w = exp(-(offset * offset) / two_sigma_sq);
        sum = sum + w * textureSampleLevel(input_texture, input_sampler, in.uv + texel * offset, 0.0);
        sum = sum + w * textureSampleLevel(input_texture, input_sampler, in.uv - texel * offset, 0.0);
        weight_sum = weight_sum + 2.0 * w;
    }
    return sum / weight_sum;
}
"#
);
