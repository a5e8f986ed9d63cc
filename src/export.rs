//! Wavefront OBJ export of the evaluated height grid.
//!
//! The GPU side is a blocking readback: the grid buffer is copied into a staging
//! buffer, mapped and polled until the map completes or [`READBACK_TIMEOUT`] passes.
//! The text side ([`write_obj`]) only needs a slice of heights.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use eframe::wgpu;

use crate::error::{ExportError, GpuError};
use crate::settings::sample_count;

pub const READBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Domain position `(x, z)` of grid sample `(gx, gy)`.
pub fn grid_position(gx: u32, gy: u32, detail: u32, bounds: f32) -> (f32, f32) {
    let d = detail.max(1) as f32;
    let x = gx as f32 / d * 2.0 * bounds - bounds;
    let z = gy as f32 / d * 2.0 * bounds - bounds;
    (x, z)
}

/// 1-based OBJ vertex indices of the two triangles of cell `(gx, gy)`.
pub fn cell_faces(gx: u32, gy: u32, detail: u32) -> [[u32; 3]; 2] {
    let side = detail + 1;
    let i0 = gy * side + gx + 1;
    let i1 = i0 + 1;
    let i2 = i0 + side;
    let i3 = i2 + 1;
    [[i0, i2, i1], [i1, i2, i3]]
}

/// Write vertices, a blank line, then faces.
pub fn write_obj<W: Write>(
    out: &mut W,
    heights: &[f32],
    detail: u32,
    bounds: f32,
) -> Result<(), ExportError> {
    let required = sample_count(detail);
    if heights.len() < required {
        return Err(ExportError::ShortBuffer {
            detail,
            available: heights.len(),
            required,
        });
    }

    write_records(out, heights, detail, bounds).map_err(|source| ExportError::Io {
        path: Default::default(),
        source,
    })
}

fn write_records<W: Write>(
    out: &mut W,
    heights: &[f32],
    detail: u32,
    bounds: f32,
) -> std::io::Result<()> {
    let side = detail + 1;
    for gy in 0..side {
        for gx in 0..side {
            let (x, z) = grid_position(gx, gy, detail, bounds);
            let y = heights[(gy * side + gx) as usize];
            writeln!(out, "v {x} {y} {z}")?;
        }
    }
    writeln!(out)?;
    for gy in 0..detail {
        for gx in 0..detail {
            for [a, b, c] in cell_faces(gx, gy, detail) {
                writeln!(out, "f {a} {b} {c}")?;
            }
        }
    }
    out.flush()
}

/// Write an OBJ file, removing it again if writing fails part way.
pub fn write_obj_file(
    path: &Path,
    heights: &[f32],
    detail: u32,
    bounds: f32,
) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let result = write_obj(&mut writer, heights, detail, bounds);
    drop(writer);

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            let _ = fs::remove_file(path);
            Err(match err {
                ExportError::Io { source, .. } => io_err(source),
                other => other,
            })
        }
    }
}

/// Copy the first `(detail + 1)^2` heights out of `buffer`.
///
/// Commands already recorded on `encoder` (typically the evaluation that filled the
/// buffer) are submitted together with the copy.
pub fn read_heights(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    mut encoder: wgpu::CommandEncoder,
    buffer: &wgpu::Buffer,
    detail: u32,
) -> Result<Vec<f32>, GpuError> {
    let samples = sample_count(detail);
    let size = (samples * std::mem::size_of::<f32>()) as u64;
    if size > buffer.size() {
        return Err(GpuError::Readback(format!(
            "grid buffer holds {} bytes, detail {detail} needs {size}",
            buffer.size()
        )));
    }

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("hf.export.staging"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let bytes = map_readback_buffer(device, &staging, size)?;
    Ok(bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn map_readback_buffer(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    size: u64,
) -> Result<Vec<u8>, GpuError> {
    let slice = buffer.slice(0..size);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    let started = Instant::now();
    let mapped = loop {
        let _ = device.poll(wgpu::PollType::Poll);
        if let Ok(result) = rx.try_recv() {
            break result.map_err(|e| GpuError::Readback(e.to_string()));
        }
        if started.elapsed() > READBACK_TIMEOUT {
            break Err(GpuError::Readback(format!(
                "buffer mapping timed out after {:?}",
                READBACK_TIMEOUT
            )));
        }
        std::thread::sleep(Duration::from_millis(1));
    };

    if let Err(err) = mapped {
        buffer.unmap();
        return Err(err);
    }

    let view = slice.get_mapped_range();
    let bytes = view.to_vec();
    drop(view);
    buffer.unmap();
    log::info!(
        "[export] readback of {size} bytes stalled the frame for {:?}",
        started.elapsed()
    );
    Ok(bytes)
}
