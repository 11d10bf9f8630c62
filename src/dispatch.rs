use super::{Error, Extent};

/// Number of execution lanes per dispatch group along each axis.
///
/// Fixed per compute kernel; every axis is strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkgroupSize([u32; 3]);

impl WorkgroupSize {
    pub fn new(lanes: [u32; 3]) -> Result<Self, Error> {
        match lanes.iter().position(|&n| n == 0) {
            Some(axis) => Err(Error::ZeroWorkgroupAxis { axis }),
            None => Ok(Self(lanes)),
        }
    }

    pub fn as_array(&self) -> [u32; 3] {
        self.0
    }

    /// Return the dispatch group counts sufficient to cover the given extent.
    ///
    /// Per axis, the smallest `groups` with `groups * lanes >= size`,
    /// which is zero for an empty axis.
    pub fn group_count(&self, extent: Extent) -> [u32; 3] {
        [
            ceil_div(extent.width, self.0[0]),
            ceil_div(extent.height, self.0[1]),
            ceil_div(extent.depth, self.0[2]),
        ]
    }
}

// Written without the `n + k - 1` trick so that sizes near
// `u32::MAX` don't overflow.
fn ceil_div(n: u32, k: u32) -> u32 {
    n / k + (n % k != 0) as u32
}

/// One-shot form of [`WorkgroupSize::group_count`], validating the lane counts.
pub fn group_count(extent: Extent, lanes: [u32; 3]) -> Result<[u32; 3], Error> {
    WorkgroupSize::new(lanes).map(|wg| wg.group_count(extent))
}

/// Where group counts end up; the backend encoder stays opaque.
pub trait ComputeEncoder {
    fn dispatch(&mut self, groups: [u32; 3]);
}

/// Dispatch enough groups of `wg_size` lanes to cover `extent`.
pub fn dispatch_extent<E: ComputeEncoder>(encoder: &mut E, wg_size: WorkgroupSize, extent: Extent) {
    encoder.dispatch(wg_size.group_count(extent));
}
