use eframe::wgpu;
use glam::Mat4;

use crate::renderer::viewport::{COLOR_FORMAT, DEPTH_FORMAT};
use crate::renderer::wgsl_templates::GRID_LINES_SHADER_SRC;

/// Reference lines drawn in each horizontal direction.
pub const GRID_LINES_PER_AXIS: u32 = 21;
const AXIS_COUNT: u32 = 3;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct LineParams {
    view_proj: [[f32; 4]; 4],
    bounds: f32,
    lines_per_axis: u32,
    _pad0: u32,
    _pad1: u32,
}

/// Instance range to draw: the full grid plus axes, or only the axes.
pub fn line_instances(grid_lines: bool) -> std::ops::Range<u32> {
    let axes_start = 2 * GRID_LINES_PER_AXIS;
    let start = if grid_lines { 0 } else { axes_start };
    start..axes_start + AXIS_COUNT
}

/// Grid and axes; independent of the height data.
pub struct GridLineRenderer {
    pipeline: wgpu::RenderPipeline,
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GridLineRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hf.lines.shader"),
            source: wgpu::ShaderSource::Wgsl(GRID_LINES_SHADER_SRC.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hf.lines.bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hf.lines.params"),
            size: std::mem::size_of::<LineParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hf.lines.bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hf.lines.layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hf.lines.pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            params_buffer,
            bind_group,
        }
    }

    pub fn prepare(&self, queue: &wgpu::Queue, view_proj: Mat4, bounds: f32) {
        let params = LineParams {
            view_proj: view_proj.to_cols_array_2d(),
            bounds,
            lines_per_axis: GRID_LINES_PER_AXIS,
            _pad0: 0,
            _pad1: 0,
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, grid_lines: bool) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..2, line_instances(grid_lines));
    }
}
