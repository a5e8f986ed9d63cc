/// Reference grid and axes. Instances `0..n` run along x, `n..2n` along z and the
/// last three are the x, y and z axes.
pub const GRID_LINES_SHADER_SRC: &str = r#"
struct LineParams {
    view_proj: mat4x4<f32>,
    bounds: f32,
    lines_per_axis: u32,
    _pad0: u32,
    _pad1: u32,
}

@group(0) @binding(0)
var<uniform> lines: LineParams;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance: u32,
) -> VsOut {
    let b = lines.bounds;
    let n = lines.lines_per_axis;
    let along = mix(-b, b, f32(vertex_index));

    var p = vec3<f32>(0.0);
    var color = vec3<f32>(0.35, 0.35, 0.38);
    if (instance < n) {
        let offset = mix(-b, b, f32(instance) / f32(n - 1u));
        p = vec3<f32>(along, 0.0, offset);
    } else if (instance < 2u * n) {
        let offset = mix(-b, b, f32(instance - n) / f32(n - 1u));
        p = vec3<f32>(offset, 0.0, along);
    } else {
        let axis = instance - 2u * n;
        if (axis == 0u) {
            p = vec3<f32>(along, 0.0, 0.0);
            color = vec3<f32>(0.9, 0.2, 0.2);
        } else if (axis == 1u) {
            p = vec3<f32>(0.0, along, 0.0);
            color = vec3<f32>(0.2, 0.85, 0.3);
        } else {
            p = vec3<f32>(0.0, 0.0, along);
            color = vec3<f32>(0.25, 0.4, 0.95);
        }
    }

    var out: VsOut;
    out.position = lines.view_proj * vec4<f32>(p, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;
