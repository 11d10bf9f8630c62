#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_qualifications,
    // We don't match on a reference, unless required.
    clippy::pattern_type_mismatch,
)]

mod buffer;
mod dispatch;
mod shader;

pub use buffer::{BufferSlot, ResourceDevice};
pub use dispatch::{dispatch_extent, group_count, ComputeEncoder, WorkgroupSize};
pub use shader::Shader;

use std::{error, fmt};

/// Total amount of work requested along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent {
    /// An extent covering a flat list of `count` elements.
    pub fn linear(count: u32) -> Self {
        Self {
            width: count,
            height: 1,
            depth: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }
}

/// Kind of memory to allocate a buffer from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Memory {
    Device,
    Shared,
    Upload,
}

#[derive(Debug)]
pub struct BufferDesc<'a> {
    pub name: &'a str,
    pub size: u64,
    pub memory: Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A workgroup axis declared zero lanes.
    ZeroWorkgroupAxis { axis: usize },
    /// `count * stride` doesn't fit in `u64`.
    SizeOverflow { count: u64, stride: u64 },
    /// The shader source isn't valid WGSL.
    ParseFailed,
    /// The shader parsed but failed validation.
    ValidationFailed,
    UnknownEntryPoint { name: String },
    /// The entry point exists but isn't a compute kernel.
    NotCompute { name: String },
    UnknownStruct { name: String },
    NotAStruct { name: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::ZeroWorkgroupAxis { axis } => {
                write!(f, "workgroup axis {} has zero lanes", axis)
            }
            Self::SizeOverflow { count, stride } => {
                write!(f, "buffer size {} x {} overflows u64", count, stride)
            }
            Self::ParseFailed => write!(f, "WGSL parsing failed"),
            Self::ValidationFailed => write!(f, "shader validation failed"),
            Self::UnknownEntryPoint { ref name } => {
                write!(f, "entry point '{}' is not in the shader", name)
            }
            Self::NotCompute { ref name } => {
                write!(f, "entry point '{}' is not a compute kernel", name)
            }
            Self::UnknownStruct { ref name } => {
                write!(f, "struct '{}' is not in the shader", name)
            }
            Self::NotAStruct { ref name } => {
                write!(f, "type '{}' is not a struct", name)
            }
        }
    }
}

impl error::Error for Error {}
