use eframe::wgpu;

use crate::registry::Slider;
use crate::renderer::grid_buffer::GridHandle;
use crate::renderer::program::{CompiledProgram, MountedProgram};
use crate::renderer::utils::workgroup_count;
use crate::renderer::wgsl::slider_values_for_layout;
use crate::renderer::wgsl_templates::WORKGROUP_SIZE;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FieldParams {
    detail: u32,
    bounds: f32,
    time: f32,
    _pad: u32,
}

/// Scalar inputs of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInputs {
    pub detail: u32,
    pub bounds: f32,
    pub time: f32,
}

/// Proof that the compute pass writing the grid has ended on the encoder.
///
/// Only [`FieldEvaluator::evaluate`] creates one, and raster stages that read the
/// grid require it.
#[derive(Debug)]
pub struct HeightsReady {
    detail: u32,
    bounds: f32,
    grid_generation: u64,
}

impl HeightsReady {
    pub fn detail(&self) -> u32 {
        self.detail
    }

    pub fn bounds(&self) -> f32 {
        self.bounds
    }

    pub fn grid_generation(&self) -> u64 {
        self.grid_generation
    }
}

struct CachedBindGroup {
    program_id: u64,
    grid_generation: u64,
    bind_group: wgpu::BindGroup,
}

pub struct FieldEvaluator {
    params_buffer: wgpu::Buffer,
    cached: Option<CachedBindGroup>,
}

impl FieldEvaluator {
    pub fn new(device: &wgpu::Device) -> Self {
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hf.field.params"),
            size: std::mem::size_of::<FieldParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            params_buffer,
            cached: None,
        }
    }

    /// Record the height dispatch into `encoder`.
    ///
    /// Slider values are written in the mounted program's layout, which may lag the
    /// registry after a failed resynthesis.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        program: &MountedProgram<CompiledProgram>,
        grid: GridHandle<'_>,
        inputs: FieldInputs,
        sliders: &[Slider],
    ) -> HeightsReady {
        let params = FieldParams {
            detail: inputs.detail,
            bounds: inputs.bounds,
            time: inputs.time,
            _pad: 0,
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        if program.program.slider_count > 0 {
            let values = slider_values_for_layout(&program.slider_layout, sliders);
            queue.write_buffer(
                &program.program.slider_buffer,
                0,
                bytemuck::cast_slice(&values),
            );
        }

        let stale = self.cached.as_ref().is_none_or(|c| {
            c.program_id != program.id || c.grid_generation != grid.generation
        });
        if stale {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("hf.field.bg"),
                layout: &program.program.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: grid.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: self.params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: program.program.slider_buffer.as_entire_binding(),
                    },
                ],
            });
            self.cached = Some(CachedBindGroup {
                program_id: program.id,
                grid_generation: grid.generation,
                bind_group,
            });
        }

        let side = inputs.detail + 1;
        let groups = workgroup_count(side, WORKGROUP_SIZE);
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("hf.field.pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&program.program.pipeline);
            if let Some(cached) = &self.cached {
                cpass.set_bind_group(0, &cached.bind_group, &[]);
            }
            cpass.dispatch_workgroups(groups, groups, 1);
        }

        HeightsReady {
            detail: inputs.detail,
            bounds: inputs.bounds,
            grid_generation: grid.generation,
        }
    }
}
