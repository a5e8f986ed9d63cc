pub mod field;
pub mod grid_lines;
pub mod surface;

pub use field::{FIELD_ENTRY, FIELD_PRELUDE, WORKGROUP_SIZE};
pub use grid_lines::GRID_LINES_SHADER_SRC;
pub use surface::SURFACE_SHADER_SRC;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::validation::validate_wgsl;

    #[test]
    fn surface_shader_validates() {
        validate_wgsl(SURFACE_SHADER_SRC).unwrap();
    }

    #[test]
    fn grid_lines_shader_validates() {
        validate_wgsl(GRID_LINES_SHADER_SRC).unwrap();
    }

    #[test]
    fn field_entry_uses_declared_workgroup_size() {
        let attr = format!("@workgroup_size({WORKGROUP_SIZE}, {WORKGROUP_SIZE}, 1)");
        assert!(FIELD_ENTRY.contains(&attr));
    }
}
