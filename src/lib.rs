//! Procedural height-field viewer.
//!
//! A user-editable registry of WGSL expressions is synthesized into a compute
//! program, evaluated over a resizable grid on the GPU, drawn as an instanced
//! surface and optionally exported as a Wavefront OBJ mesh.

pub mod app;
pub mod camera;
pub mod console;
pub mod error;
pub mod export;
pub mod gpu;
pub mod project;
pub mod registry;
pub mod renderer;
pub mod settings;
pub mod ui;
