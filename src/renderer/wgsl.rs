//! Height program synthesis.
//!
//! The registry is rendered into a single WGSL compute module:
//!
//! 1. the fixed prelude (bindings, `FieldParams`, `TIME`)
//! 2. helper signatures, as comment lines
//! 3. `const` declarations for constants
//! 4. `var<private>` declarations for sliders
//! 5. the fixed entry point
//! 6. the generated slider loader and every function body, `f` included
//!
//! Sections 2-4 sit at a single insertion point right after the prelude. WGSL module
//! scope is order independent, so functions may call each other regardless of the
//! order they appear in the registry.

use std::fmt::Write as _;

use crate::registry::{Slider, SymbolRegistry};
use crate::renderer::utils::fmt_f32;
use crate::renderer::wgsl_templates::{FIELD_ENTRY, FIELD_PRELUDE};

pub const SLIDER_LOADER: &str = "load_sliders";

/// Synthesized WGSL for one registry revision.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSource {
    pub text: String,
    /// Slider names in `slider_values` buffer order.
    pub slider_layout: Vec<String>,
    pub revision: u64,
}

impl ProgramSource {
    pub fn synthesize(registry: &SymbolRegistry) -> Self {
        let mut text = String::with_capacity(FIELD_PRELUDE.len() + FIELD_ENTRY.len() + 512);
        text.push_str(FIELD_PRELUDE);
        text.push('\n');

        for function in registry.functions() {
            let _ = writeln!(text, "// fn {}(x: f32, z: f32) -> f32", function.name);
        }
        for constant in registry.constants() {
            let _ = writeln!(
                text,
                "const {}: f32 = {};",
                constant.name,
                fmt_f32(constant.value)
            );
        }
        for slider in registry.sliders() {
            let _ = writeln!(text, "var<private> {}: f32;", slider.name);
        }
        text.push('\n');

        text.push_str(FIELD_ENTRY);
        text.push('\n');

        let _ = writeln!(text, "fn {SLIDER_LOADER}() {{");
        for (i, slider) in registry.sliders().iter().enumerate() {
            let _ = writeln!(text, "    {} = slider_values[{i}u];", slider.name);
        }
        text.push_str("}\n");

        for function in registry.functions() {
            let _ = writeln!(
                text,
                "\nfn {}(x: f32, z: f32) -> f32 {{\n    return {};\n}}",
                function.name,
                function.expression.trim()
            );
        }

        Self {
            text,
            slider_layout: registry.sliders().iter().map(|s| s.name.clone()).collect(),
            revision: registry.revision(),
        }
    }
}

/// Slider values laid out for a compiled program.
///
/// Each layout entry is matched by name first. A slider that was renamed since the
/// program compiled falls back to the slider at the same position, and missing
/// entries read as `0.0`.
pub fn slider_values_for_layout(layout: &[String], sliders: &[Slider]) -> Vec<f32> {
    layout
        .iter()
        .enumerate()
        .map(|(i, name)| {
            sliders
                .iter()
                .find(|s| &s.name == name)
                .or_else(|| sliders.get(i))
                .map(|s| s.value)
                .unwrap_or(0.0)
        })
        .collect()
}
