use eframe::wgpu;

use crate::settings::sample_count;

/// Capacity bookkeeping for the grid buffer: grows on demand, never shrinks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GrowOnlyCapacity {
    capacity: usize,
    generation: u64,
}

impl GrowOnlyCapacity {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bumped on every reallocation, starting at 1 for the first allocation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` when `samples` does not fit and storage must be reallocated
    /// at exactly `samples` elements.
    pub fn grow_to(&mut self, samples: usize) -> bool {
        if samples <= self.capacity {
            return false;
        }
        self.capacity = samples;
        self.generation += 1;
        true
    }
}

#[derive(Clone, Copy)]
pub struct GridHandle<'a> {
    pub buffer: &'a wgpu::Buffer,
    pub generation: u64,
}

/// Owns the height buffer, `(detail + 1)^2` floats indexed `gy * (detail + 1) + gx`.
#[derive(Default)]
pub struct GridBufferManager {
    policy: GrowOnlyCapacity,
    buffer: Option<wgpu::Buffer>,
}

impl GridBufferManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        self.policy.capacity()
    }

    pub fn generation(&self) -> u64 {
        self.policy.generation()
    }

    pub fn ensure_capacity(&mut self, device: &wgpu::Device, detail: u32) -> GridHandle<'_> {
        let required = sample_count(detail);
        if self.policy.grow_to(required) {
            log::debug!(
                "[grid] reallocating height buffer: {required} samples (detail {detail}, generation {})",
                self.policy.generation()
            );
            self.buffer = None;
        }
        let capacity = self.policy.capacity();
        let buffer = self
            .buffer
            .get_or_insert_with(|| create_grid_buffer(device, capacity));
        GridHandle {
            buffer,
            generation: self.policy.generation(),
        }
    }
}

fn create_grid_buffer(device: &wgpu::Device, samples: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("hf.grid.heights"),
        size: (samples.max(1) * std::mem::size_of::<f32>()) as u64,
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_only_when_required_exceeds_capacity() {
        let mut policy = GrowOnlyCapacity::default();
        assert!(policy.grow_to(sample_count(4)));
        assert_eq!(policy.capacity(), 25);
        assert_eq!(policy.generation(), 1);

        assert!(!policy.grow_to(sample_count(2)));
        assert!(!policy.grow_to(sample_count(4)));
        assert_eq!(policy.generation(), 1);

        assert!(policy.grow_to(sample_count(8)));
        assert_eq!(policy.capacity(), 81);
        assert_eq!(policy.generation(), 2);
    }
}
