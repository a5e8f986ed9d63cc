/// Edge length of the square compute workgroup used by the height program.
pub const WORKGROUP_SIZE: u32 = 16;

/// Built-in declarations of the height program. Generated constants and slider
/// declarations are inserted right after this block.
pub const FIELD_PRELUDE: &str = r#"struct FieldParams {
    detail: u32,
    bounds: f32,
    time: f32,
    _pad: u32,
}

@group(0) @binding(0)
var<storage, read_write> values: array<f32>;

@group(0) @binding(1)
var<uniform> field: FieldParams;

@group(0) @binding(2)
var<storage, read> slider_values: array<f32>;

var<private> TIME: f32;
"#;

/// Grid-index math, domain remap and the output write.
pub const FIELD_ENTRY: &str = r#"@compute @workgroup_size(16, 16, 1)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let side = field.detail + 1u;
    if (gid.x >= side || gid.y >= side) {
        return;
    }
    TIME = field.time;
    load_sliders();
    let pos = vec2<f32>(gid.xy) / f32(field.detail) * 2.0 * field.bounds - vec2<f32>(field.bounds);
    values[gid.y * side + gid.x] = f(pos.x, pos.y);
}
"#;
