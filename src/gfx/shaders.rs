//! WGSL sources of the four cell programs
//!
//! Every program draws one full-target quad from [`VERTEX`]. In the cell
//! passes the fragment position is the texel being written; the state is held
//! in the red channel and is either 0 or 1.

/// Full-target triangle strip, no vertex buffer.
pub const VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let x = f32(index & 1u) * 2.0 - 1.0;
    let y = f32(index >> 1u) * 2.0 - 1.0;
    var out: VertexOutput;
    out.position = vec4<f32>(x, y, 0.0, 1.0);
    return out;
}
"#;

pub const SEED: &str = r#"
struct SeedUniforms {
    resolution: vec2<f32>,
    seed: f32,
    alive_ratio: f32,
};

@group(0) @binding(0) var<uniform> params: SeedUniforms;

fn hash21(p: vec2<f32>) -> f32 {
    var st = fract(p * vec2<f32>(123.45, 456.78));
    st += dot(st, st + params.seed * 42.0);
    return fract(st.x * st.y);
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let alive = select(0.0, 1.0, hash21(position.xy / params.resolution) < params.alive_ratio);
    return vec4<f32>(alive, alive, alive, 1.0);
}
"#;

pub const STEP: &str = r#"
@group(0) @binding(0) var state: texture_2d<f32>;

fn cell(p: vec2<i32>, size: vec2<i32>) -> f32 {
    let wrapped = ((p % size) + size) % size;
    return textureLoad(state, wrapped, 0).r;
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let size = vec2<i32>(textureDimensions(state));
    let here = vec2<i32>(floor(position.xy));

    var sum = 0.0;
    for (var dy = -1; dy <= 1; dy++) {
        for (var dx = -1; dx <= 1; dx++) {
            sum += cell(here + vec2<i32>(dx, dy), size);
        }
    }

    let count = i32(round(sum));
    var next = 0.0;
    if count == 3 {
        next = 1.0;
    } else if count == 4 {
        next = cell(here, size);
    }
    return vec4<f32>(next, next, next, 1.0);
}
"#;

pub const EDIT: &str = r#"
struct EditUniforms {
    cursor: vec2<u32>,
    paint: u32,
    _padding: u32,
};

@group(0) @binding(0) var<uniform> params: EditUniforms;
@group(0) @binding(1) var state: texture_2d<f32>;

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let here = vec2<u32>(floor(position.xy));
    var value = textureLoad(state, here, 0).r;
    if all(here == params.cursor) {
        if params.paint == 1u {
            value = 1.0;
        } else if params.paint == 2u {
            value = 0.0;
        }
    }
    return vec4<f32>(value, value, value, 1.0);
}
"#;

pub const PRESENT: &str = r#"
struct PresentUniforms {
    screen_resolution: vec2<f32>,
    resolution: vec2<f32>,
    offset: vec2<f32>,
    scrollbar_start: vec2<f32>,
    scale: f32,
    blend: f32,
    padding: f32,
    dot_radius: f32,
    edge_softness: f32,
    scrollbar_length: f32,
    scrollbar_visible: f32,
    _padding: f32,
};

@group(0) @binding(0) var<uniform> view: PresentUniforms;
@group(0) @binding(1) var previous: texture_2d<f32>;
@group(0) @binding(2) var current: texture_2d<f32>;

fn rect(st: vec2<f32>, origin: vec2<f32>, size: vec2<f32>) -> f32 {
    return select(0.0, 1.0, all(st >= origin) && all(st <= origin + size));
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let uv = vec2<f32>(
        position.x / view.screen_resolution.x,
        1.0 - position.y / view.screen_resolution.y,
    );
    let ratio = view.screen_resolution.x / view.screen_resolution.y;
    let aspect = vec2<f32>(max(ratio, 1.0), max(1.0 / ratio, 1.0));
    var st = (uv - 0.5) * aspect + 0.5;
    st = st * (1.0 + 2.0 * view.padding) - view.padding;

    var bars = 0.0;
    if view.scrollbar_visible > 0.5 {
        bars = rect(st, vec2<f32>(view.scrollbar_start.x, -0.01), vec2<f32>(view.scrollbar_length, 0.005))
            + rect(st, vec2<f32>(-0.01, view.scrollbar_start.y), vec2<f32>(0.005, view.scrollbar_length));
    }

    st = (st + view.offset) * view.scale;
    if any(st < vec2<f32>(0.0)) || any(st >= vec2<f32>(1.0)) {
        let c = min(bars, 1.0);
        return vec4<f32>(c, c, c, 1.0);
    }

    let limit = vec2<i32>(view.resolution) - 1;
    let texel = clamp(vec2<i32>(floor(st * view.resolution)), vec2<i32>(0), limit);
    let centre = (vec2<f32>(texel) + 0.5) / view.resolution;
    let rv = view.dot_radius / view.resolution;
    let radius = min(rv.x, rv.y);
    let mask = 1.0 - smoothstep(radius, radius + view.edge_softness * view.scale, length(st - centre));

    let last = textureLoad(previous, texel, 0).r;
    let next = textureLoad(current, texel, 0).r;
    let c = min(mix(last, next, view.blend) * mask + bars, 1.0);
    return vec4<f32>(c, c, c, 1.0);
}
"#;
