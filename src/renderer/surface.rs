//! Instanced height-field surface.
//!
//! Each grid cell is one instance of a shared four-corner quad. The vertex stage reads
//! heights straight from the grid buffer, so the draw requires a [`HeightsReady`] from
//! the evaluation recorded earlier on the same encoder.

use eframe::wgpu;
use glam::{Mat4, Vec3};

use crate::renderer::evaluator::HeightsReady;
use crate::renderer::grid_buffer::GridHandle;
use crate::renderer::viewport::{COLOR_FORMAT, DEPTH_FORMAT};
use crate::renderer::wgsl_templates::SURFACE_SHADER_SRC;

const QUAD_CORNERS: [[u32; 2]; 4] = [[0, 0], [1, 0], [0, 1], [1, 1]];
const QUAD_INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SurfaceParams {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
    detail: u32,
    bounds: f32,
    wireframe: u32,
    _pad: u32,
}

/// Index range `(start, start + 1)` used for the finite difference at grid
/// coordinate `g`. The last sample reuses the previous edge so nothing past the row
/// is read.
pub fn neighbor_span(g: u32, detail: u32) -> (u32, u32) {
    let start = if g >= detail { g.saturating_sub(1) } else { g };
    (start, start + 1)
}

/// CPU twin of the vertex-stage normal for sample `(gx, gy)` of a row-major grid.
pub fn surface_normal(heights: &[f32], detail: u32, bounds: f32, gx: u32, gy: u32) -> Vec3 {
    let side = detail + 1;
    let world = |x: u32, y: u32| {
        let step = 2.0 * bounds / detail as f32;
        let h = heights
            .get((y * side + x) as usize)
            .copied()
            .unwrap_or(0.0);
        Vec3::new(x as f32 * step - bounds, h, y as f32 * step - bounds)
    };
    let (x0, x1) = neighbor_span(gx, detail);
    let (z0, z1) = neighbor_span(gy, detail);
    let dx = world(x1, gy) - world(x0, gy);
    let dz = world(gx, z1) - world(gx, z0);
    dz.cross(dx).normalize_or_zero()
}

/// Per-frame inputs of the surface draw.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceStyle {
    pub color: [f32; 4],
    pub wireframe: bool,
}

pub struct SurfaceRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    corner_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    cached: Option<(u64, wgpu::BindGroup)>,
}

impl SurfaceRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hf.surface.shader"),
            source: wgpu::ShaderSource::Wgsl(SURFACE_SHADER_SRC.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hf.surface.bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hf.surface.layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hf.surface.pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[u32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Uint32x2],
                }],
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
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hf.surface.params"),
            size: std::mem::size_of::<SurfaceParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hf.surface.corners"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hf.surface.indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            bind_group_layout,
            params_buffer,
            corner_buffer,
            index_buffer,
            cached: None,
        }
    }

    /// Upload uniforms and refresh the bind group for `grid`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        grid: GridHandle<'_>,
        ready: &HeightsReady,
        view_proj: Mat4,
        style: SurfaceStyle,
    ) {
        let params = SurfaceParams {
            view_proj: view_proj.to_cols_array_2d(),
            color: style.color,
            detail: ready.detail(),
            bounds: ready.bounds(),
            wireframe: u32::from(style.wireframe),
            _pad: 0,
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        if self.cached.as_ref().is_none_or(|(g, _)| *g != grid.generation) {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("hf.surface.bg"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: grid.buffer.as_entire_binding(),
                    },
                ],
            });
            self.cached = Some((grid.generation, bind_group));
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, ready: &HeightsReady) {
        let Some((generation, bind_group)) = &self.cached else {
            return;
        };
        if *generation != ready.grid_generation() {
            log::warn!("[surface] bind group is stale, skipping draw");
            return;
        }
        let instances = ready.detail() * ready.detail();
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instances);
    }
}
