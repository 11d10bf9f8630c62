use std::fmt::Debug;

use super::{BufferDesc, Error, Memory};

/// Resource side of a GPU device, kept opaque.
///
/// Buffer handles are plain copyable tokens; the device owns the actual
/// allocations and is responsible for synchronization.
pub trait ResourceDevice {
    type Buffer: Send + Sync + Clone + Copy + Debug;

    fn create_buffer(&self, desc: BufferDesc) -> Self::Buffer;
    fn destroy_buffer(&self, buffer: Self::Buffer);
    fn write_buffer(&self, buffer: Self::Buffer, offset: u64, data: &[u8]);
}

struct Allocation<B> {
    raw: B,
    size: u64,
}

/// A slot holding at most one buffer of `count * stride` bytes.
///
/// Reallocates when the required size changes, destroying the old buffer
/// first. The caller owns the device and must call [`release`](Self::release)
/// before dropping the slot.
pub struct BufferSlot<D: ResourceDevice> {
    name: String,
    memory: Memory,
    allocation: Option<Allocation<D::Buffer>>,
}

impl<D: ResourceDevice> BufferSlot<D> {
    pub fn new(name: &str, memory: Memory) -> Self {
        Self {
            name: name.to_string(),
            memory,
            allocation: None,
        }
    }

    /// Currently held buffer, if any.
    pub fn raw(&self) -> Option<D::Buffer> {
        self.allocation.as_ref().map(|alloc| alloc.raw)
    }

    pub fn size(&self) -> u64 {
        self.allocation.as_ref().map_or(0, |alloc| alloc.size)
    }

    /// Make the slot hold a buffer of exactly `count` elements of `stride`
    /// bytes, reusing the current allocation when the size already matches.
    #[profiling::function]
    pub fn ensure(&mut self, device: &D, count: u64, stride: u64) -> Result<D::Buffer, Error> {
        let size = count
            .checked_mul(stride)
            .ok_or(Error::SizeOverflow { count, stride })?;

        if let Some(ref alloc) = self.allocation {
            if alloc.size == size {
                return Ok(alloc.raw);
            }
            log::debug!(
                "Reallocating '{}': {} -> {} bytes",
                self.name,
                alloc.size,
                size
            );
            device.destroy_buffer(alloc.raw);
            self.allocation = None;
        }

        let raw = device.create_buffer(BufferDesc {
            name: &self.name,
            size,
            memory: self.memory,
        });
        self.allocation = Some(Allocation { raw, size });
        Ok(raw)
    }

    /// Size the slot for `data` and upload its contents.
    pub fn write_pod<T: bytemuck::Pod>(
        &mut self,
        device: &D,
        data: &[T],
    ) -> Result<D::Buffer, Error> {
        let raw = self.ensure(device, data.len() as u64, std::mem::size_of::<T>() as u64)?;
        if !data.is_empty() {
            device.write_buffer(raw, 0, bytemuck::cast_slice(data));
        }
        Ok(raw)
    }

    /// Destroy the held buffer, if any. Safe to call repeatedly.
    pub fn release(&mut self, device: &D) {
        if let Some(alloc) = self.allocation.take() {
            device.destroy_buffer(alloc.raw);
        }
    }
}
