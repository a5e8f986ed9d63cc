/// Instanced surface: one quad per grid cell, heights read from the grid buffer.
pub const SURFACE_SHADER_SRC: &str = r#"
struct SurfaceParams {
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    detail: u32,
    bounds: f32,
    wireframe: u32,
    _pad: u32,
}

@group(0) @binding(0)
var<uniform> surface: SurfaceParams;

@group(0) @binding(1)
var<storage, read> heights: array<f32>;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) cell_uv: vec2<f32>,
}

fn world_at(gx: u32, gy: u32) -> vec3<f32> {
    let d = f32(surface.detail);
    let p = vec2<f32>(f32(gx), f32(gy)) / d * 2.0 * surface.bounds - vec2<f32>(surface.bounds);
    let h = heights[gy * (surface.detail + 1u) + gx];
    return vec3<f32>(p.x, h, p.y);
}

// The last row and column use the backward difference.
fn edge_start(g: u32) -> u32 {
    return select(g, g - 1u, g >= surface.detail);
}

@vertex
fn vs_main(
    @location(0) corner: vec2<u32>,
    @builtin(instance_index) instance: u32,
) -> VsOut {
    let gx = instance % surface.detail + corner.x;
    let gy = instance / surface.detail + corner.y;

    let ex = edge_start(gx);
    let ez = edge_start(gy);
    let dx = world_at(ex + 1u, gy) - world_at(ex, gy);
    let dz = world_at(gx, ez + 1u) - world_at(gx, ez);

    var out: VsOut;
    out.position = surface.view_proj * vec4<f32>(world_at(gx, gy), 1.0);
    out.normal = normalize(cross(dz, dx));
    out.cell_uv = vec2<f32>(corner);
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let light = normalize(vec3<f32>(0.4, 1.0, 0.3));
    let diffuse = abs(dot(normalize(in.normal), light));
    var rgb = surface.color.rgb * (0.25 + 0.75 * diffuse);

    let w = max(fwidth(in.cell_uv), vec2<f32>(1e-5));
    let edge = min(in.cell_uv, vec2<f32>(1.0) - in.cell_uv) / w;
    let on_edge = 1.0 - clamp(min(edge.x, edge.y), 0.0, 1.0);
    if (surface.wireframe != 0u) {
        rgb = mix(rgb, rgb * 0.2, on_edge);
    }
    return vec4<f32>(rgb, surface.color.a);
}
"#;
