use std::path::Path;

use eframe::wgpu;
use glam::Mat4;

use crate::console::Console;
use crate::error::{ExportError, GpuError};
use crate::export;
use crate::registry::SymbolRegistry;
use crate::renderer::evaluator::{FieldEvaluator, FieldInputs};
use crate::renderer::grid_buffer::GridBufferManager;
use crate::renderer::grid_lines::GridLineRenderer;
use crate::renderer::program::{CompiledProgram, ProgramSlot, SyncOutcome, SynthesisState};
use crate::renderer::surface::{SurfaceRenderer, SurfaceStyle};
use crate::renderer::viewport::Viewport;
use crate::settings::{Settings, clamp_bounds, clamp_detail};

/// Everything one frame needs besides the registry.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub settings: &'a Settings,
    pub view_proj: Mat4,
    pub time: f32,
}

/// GPU side of the height-field pipeline: program slot, grid storage, evaluator and
/// the two raster stages.
pub struct HeightField {
    device: wgpu::Device,
    queue: wgpu::Queue,
    programs: ProgramSlot<CompiledProgram>,
    grid: GridBufferManager,
    evaluator: FieldEvaluator,
    surface: SurfaceRenderer,
    lines: GridLineRenderer,
}

impl HeightField {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            programs: ProgramSlot::default(),
            grid: GridBufferManager::new(),
            evaluator: FieldEvaluator::new(device),
            surface: SurfaceRenderer::new(device),
            lines: GridLineRenderer::new(device),
        }
    }

    /// Resynthesize if the registry revision moved since the last attempt.
    pub fn synchronize(&mut self, registry: &SymbolRegistry, console: &mut Console) -> SyncOutcome {
        let device = &self.device;
        self.programs
            .sync(registry, console, |source| CompiledProgram::compile(device, source))
    }

    pub fn mark_dirty(&mut self) {
        self.programs.mark_dirty();
    }

    pub fn synthesis_state(&self) -> &SynthesisState {
        self.programs.state()
    }

    pub fn mounted_program_id(&self) -> Option<u64> {
        self.programs.mounted().map(|m| m.id)
    }

    pub fn grid_capacity(&self) -> usize {
        self.grid.capacity()
    }

    pub fn grid_generation(&self) -> u64 {
        self.grid.generation()
    }

    /// Evaluate the field and draw the surface and grid lines into `viewport`.
    pub fn render(&mut self, viewport: &Viewport, registry: &SymbolRegistry, frame: FrameInputs<'_>) {
        let settings = frame.settings;
        let inputs = FieldInputs {
            detail: clamp_detail(settings.detail),
            bounds: clamp_bounds(settings.bounds),
            time: frame.time,
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hf.frame.encoder"),
        });

        let grid = self.grid.ensure_capacity(&self.device, inputs.detail);
        let ready = self.programs.mounted().map(|program| {
            self.evaluator.evaluate(
                &self.device,
                &self.queue,
                &mut encoder,
                program,
                grid,
                inputs,
                registry.sliders(),
            )
        });

        if let Some(ready) = &ready {
            self.surface.prepare(
                &self.device,
                &self.queue,
                grid,
                ready,
                frame.view_proj,
                SurfaceStyle {
                    color: settings.surface_color,
                    wireframe: settings.wireframe,
                },
            );
        }
        self.lines.prepare(&self.queue, frame.view_proj, inputs.bounds);

        let [r, g, b, a] = settings.background.map(f64::from);
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hf.frame.pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: viewport.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: viewport.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(ready) = &ready {
                self.surface.draw(&mut pass, ready);
            }
            self.lines.draw(&mut pass, settings.grid_lines);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Evaluate once and read the heights back, blocking until the map completes.
    pub fn read_heights(
        &mut self,
        registry: &SymbolRegistry,
        settings: &Settings,
        time: f32,
    ) -> Result<Vec<f32>, GpuError> {
        let program = self.programs.mounted().ok_or(GpuError::NoProgram)?;
        let inputs = FieldInputs {
            detail: clamp_detail(settings.detail),
            bounds: clamp_bounds(settings.bounds),
            time,
        };
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hf.export.encoder"),
        });
        let grid = self.grid.ensure_capacity(&self.device, inputs.detail);
        self.evaluator.evaluate(
            &self.device,
            &self.queue,
            &mut encoder,
            program,
            grid,
            inputs,
            registry.sliders(),
        );
        export::read_heights(&self.device, &self.queue, encoder, grid.buffer, inputs.detail)
    }

    /// Evaluate the current program and write it to `path` as an OBJ mesh.
    pub fn export_obj(
        &mut self,
        path: &Path,
        registry: &SymbolRegistry,
        settings: &Settings,
        time: f32,
    ) -> Result<(), ExportError> {
        let heights = self.read_heights(registry, settings, time)?;
        export::write_obj_file(
            path,
            &heights,
            clamp_detail(settings.detail),
            clamp_bounds(settings.bounds),
        )
    }
}
