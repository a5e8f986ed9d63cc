//! Compiled height programs and the resynthesis state machine.

use std::sync::atomic::{AtomicU64, Ordering};

use eframe::wgpu;

use crate::console::Console;
use crate::error::CompileError;
use crate::registry::SymbolRegistry;
use crate::renderer::validation::{number_lines, validate_wgsl};
use crate::renderer::wgsl::ProgramSource;

/// GPU objects for one successfully compiled [`ProgramSource`].
pub struct CompiledProgram {
    pub pipeline: wgpu::ComputePipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// One `f32` per slider in the compiled layout, never smaller than one element.
    pub slider_buffer: wgpu::Buffer,
    pub slider_count: usize,
}

impl CompiledProgram {
    pub fn compile(device: &wgpu::Device, source: &ProgramSource) -> Result<Self, CompileError> {
        validate_wgsl(&source.text)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hf.field.compute"),
            source: wgpu::ShaderSource::Wgsl(source.text.as_str().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hf.field.bgl"),
            entries: &[
                storage_entry(0, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(2, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hf.field.layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("hf.field.pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let slider_count = source.slider_layout.len();
        let slider_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hf.field.sliders"),
            size: (slider_count.max(1) * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(CompileError::new(err.to_string()));
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
            slider_buffer,
            slider_count,
        })
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Resynthesis state, keyed on the registry revision it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisState {
    /// No revision has been attempted yet, or a rebuild was forced.
    Dirty,
    Recompiling { revision: u64 },
    Clean { revision: u64 },
    Error { revision: u64, diagnostic: String },
}

impl SynthesisState {
    /// Revision that has already been attempted, successfully or not.
    fn settled_revision(&self) -> Option<u64> {
        match self {
            Self::Clean { revision } | Self::Error { revision, .. } => Some(*revision),
            Self::Dirty | Self::Recompiling { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Mounted { program_id: u64 },
    RolledBack,
}

pub struct MountedProgram<P> {
    pub id: u64,
    pub revision: u64,
    pub slider_layout: Vec<String>,
    pub program: P,
}

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Holds the mounted program and decides when the registry must be resynthesized.
pub struct ProgramSlot<P> {
    state: SynthesisState,
    mounted: Option<MountedProgram<P>>,
}

impl<P> Default for ProgramSlot<P> {
    fn default() -> Self {
        Self {
            state: SynthesisState::Dirty,
            mounted: None,
        }
    }
}

impl<P> ProgramSlot<P> {
    pub fn state(&self) -> &SynthesisState {
        &self.state
    }

    pub fn mounted(&self) -> Option<&MountedProgram<P>> {
        self.mounted.as_ref()
    }

    pub fn mark_dirty(&mut self) {
        self.state = SynthesisState::Dirty;
    }

    /// Bring the mounted program up to date with `registry`.
    ///
    /// A revision is compiled at most once. On failure the previous program stays
    /// mounted and exactly one error is appended to `console`.
    pub fn sync<F>(&mut self, registry: &SymbolRegistry, console: &mut Console, compile: F) -> SyncOutcome
    where
        F: FnOnce(&ProgramSource) -> Result<P, CompileError>,
    {
        let revision = registry.revision();
        if self.state.settled_revision() == Some(revision) {
            return SyncOutcome::Unchanged;
        }

        self.state = SynthesisState::Recompiling { revision };
        let source = ProgramSource::synthesize(registry);

        match compile(&source) {
            Ok(program) => {
                let id = NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed);
                log::debug!("[synth] mounted program {id} for revision {revision}");
                self.mounted = Some(MountedProgram {
                    id,
                    revision,
                    slider_layout: source.slider_layout,
                    program,
                });
                self.state = SynthesisState::Clean { revision };
                SyncOutcome::Mounted { program_id: id }
            }
            Err(err) => {
                let kept = match &self.mounted {
                    Some(m) => format!("keeping program {}", m.id),
                    None => "no program mounted".to_string(),
                };
                console.error(format!("[synth] compile failed ({kept}):\n{}", err.diagnostic));
                log::debug!("[synth] rejected source:\n{}", number_lines(&source.text));
                self.state = SynthesisState::Error {
                    revision,
                    diagnostic: err.diagnostic,
                };
                SyncOutcome::RolledBack
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(_: &ProgramSource) -> Result<&'static str, CompileError> {
        Ok("program")
    }

    fn reject(_: &ProgramSource) -> Result<&'static str, CompileError> {
        Err(CompileError::new("error: bad token"))
    }

    #[test]
    fn first_sync_mounts_and_second_is_unchanged() {
        let registry = SymbolRegistry::new();
        let mut console = Console::default();
        let mut slot = ProgramSlot::default();

        let SyncOutcome::Mounted { program_id } = slot.sync(&registry, &mut console, accept) else {
            panic!("expected a mounted program");
        };
        assert_eq!(slot.sync(&registry, &mut console, accept), SyncOutcome::Unchanged);
        assert_eq!(slot.mounted().map(|m| m.id), Some(program_id));
        assert_eq!(
            slot.state(),
            &SynthesisState::Clean {
                revision: registry.revision()
            }
        );
        assert!(console.is_empty());
    }

    #[test]
    fn failure_keeps_previous_program_and_logs_once() {
        let mut registry = SymbolRegistry::new();
        let mut console = Console::default();
        let mut slot = ProgramSlot::default();
        slot.sync(&registry, &mut console, accept);
        let id = slot.mounted().map(|m| m.id);

        registry.set_expression(0, "sin(").unwrap();
        assert_eq!(slot.sync(&registry, &mut console, reject), SyncOutcome::RolledBack);
        assert_eq!(slot.sync(&registry, &mut console, reject), SyncOutcome::Unchanged);

        assert_eq!(slot.mounted().map(|m| m.id), id);
        assert_eq!(console.len(), 1);
        assert!(matches!(slot.state(), SynthesisState::Error { .. }));
    }

    #[test]
    fn mark_dirty_forces_a_rebuild() {
        let registry = SymbolRegistry::new();
        let mut console = Console::default();
        let mut slot = ProgramSlot::default();
        slot.sync(&registry, &mut console, accept);
        slot.mark_dirty();
        assert!(matches!(
            slot.sync(&registry, &mut console, accept),
            SyncOutcome::Mounted { .. }
        ));
    }
}
