use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    #[display(fmt = "no such device")]
    NotFound,
    #[display(fmt = "block {} is beyond the end of the device", block)]
    OutOfRange { block: u64 },
    /// 缓冲区长度与块大小不符
    #[display(fmt = "buffer holds {} bytes, a block is {}", actual, expected)]
    BufferSize { expected: usize, actual: usize },
    #[display(fmt = "device failed to read block {}", block)]
    Io { block: u64 },
}

impl core::error::Error for DeviceError {}
