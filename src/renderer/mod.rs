//! GPU height-field pipeline.
//!
//! - `wgsl`: program synthesis from the symbol registry
//! - `validation`: naga pre-validation of synthesized WGSL
//! - `program`: compiled programs and the resynthesis state machine
//! - `grid_buffer`: grow-only height storage
//! - `evaluator`: compute dispatch and the `HeightsReady` barrier token
//! - `surface` / `grid_lines`: raster stages
//! - `viewport`: offscreen targets
//! - `height_field`: the per-frame sequence tying the above together

pub mod evaluator;
pub mod grid_buffer;
pub mod grid_lines;
pub mod height_field;
pub mod program;
pub mod surface;
pub mod utils;
pub mod validation;
pub mod viewport;
pub mod wgsl;
pub mod wgsl_templates;

pub use evaluator::{FieldInputs, HeightsReady};
pub use height_field::{FrameInputs, HeightField};
pub use program::{CompiledProgram, ProgramSlot, SyncOutcome, SynthesisState};
pub use validation::validate_wgsl;
pub use viewport::Viewport;
pub use wgsl::ProgramSource;
