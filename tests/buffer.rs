use std::{cell::RefCell, collections::HashMap};

use dispatch_util::{BufferDesc, BufferSlot, Error, Memory, ResourceDevice};

#[derive(Default)]
struct MockDevice {
    next_id: RefCell<u32>,
    live: RefCell<HashMap<u32, u64>>,
    writes: RefCell<Vec<(u32, u64, Vec<u8>)>>,
}

impl MockDevice {
    fn live_count(&self) -> usize {
        self.live.borrow().len()
    }
}

impl ResourceDevice for MockDevice {
    type Buffer = u32;

    fn create_buffer(&self, desc: BufferDesc) -> u32 {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;
        self.live.borrow_mut().insert(id, desc.size);
        id
    }

    fn destroy_buffer(&self, buffer: u32) {
        let removed = self.live.borrow_mut().remove(&buffer);
        assert!(removed.is_some(), "double destroy of buffer {}", buffer);
    }

    fn write_buffer(&self, buffer: u32, offset: u64, data: &[u8]) {
        assert!(self.live.borrow().contains_key(&buffer));
        self.writes
            .borrow_mut()
            .push((buffer, offset, data.to_vec()));
    }
}

#[test]
fn allocates_once_for_same_size() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("points", Memory::Device);

    let first = slot.ensure(&device, 100, 16).unwrap();
    let second = slot.ensure(&device, 100, 16).unwrap();
    assert_eq!(first, second);
    assert_eq!(device.live_count(), 1);
    assert_eq!(slot.size(), 1600);

    slot.release(&device);
}

#[test]
fn reallocates_on_resize() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("points", Memory::Device);

    let small = slot.ensure(&device, 10, 4).unwrap();
    let large = slot.ensure(&device, 20, 4).unwrap();
    assert_ne!(small, large);
    // the old buffer went back to the device
    assert_eq!(device.live_count(), 1);
    assert_eq!(slot.raw(), Some(large));
    assert_eq!(slot.size(), 80);

    slot.release(&device);
    assert_eq!(device.live_count(), 0);
    assert_eq!(slot.raw(), None);
}

#[test]
fn release_is_idempotent() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("scratch", Memory::Upload);

    slot.ensure(&device, 1, 256).unwrap();
    slot.release(&device);
    slot.release(&device);
    assert_eq!(device.live_count(), 0);
}

#[test]
fn rejects_size_overflow() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("huge", Memory::Device);

    assert_eq!(
        slot.ensure(&device, u64::MAX, 2),
        Err(Error::SizeOverflow {
            count: u64::MAX,
            stride: 2
        })
    );
    assert_eq!(device.live_count(), 0);
}

#[test]
fn uploads_pod_contents() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("samples", Memory::Shared);

    let data: [u32; 3] = [7, 11, 13];
    let raw = slot.write_pod(&device, &data).unwrap();
    assert_eq!(slot.size(), 12);

    let writes = device.writes.borrow();
    assert_eq!(writes.len(), 1);
    let (buffer, offset, ref bytes) = writes[0];
    assert_eq!(buffer, raw);
    assert_eq!(offset, 0);
    assert_eq!(bytes, bytemuck::cast_slice::<u32, u8>(&data));

    drop(writes);
    slot.release(&device);
}

#[test]
fn empty_upload_writes_nothing() {
    let device = MockDevice::default();
    let mut slot = BufferSlot::<MockDevice>::new("empty", Memory::Shared);

    slot.write_pod::<f32>(&device, &[]).unwrap();
    assert!(device.writes.borrow().is_empty());

    slot.release(&device);
}
