//! 内存模拟块设备

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{BlockDevice, DeviceError};

/// 内存中的只读磁盘镜像，
/// 用于测试以及把镜像整个载入内存的宿主
#[derive(Debug)]
pub struct RamDisk {
    data: Box<[u8]>,
    block_size: usize,
}

impl RamDisk {
    /// 末尾不足一块的部分会被丢弃
    pub fn new(mut data: Vec<u8>, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be positive");
        data.truncate(data.len() / block_size * block_size);

        Self {
            data: data.into(),
            block_size,
        }
    }

    #[inline]
    pub fn total_blocks(&self) -> u64 {
        (self.data.len() / self.block_size) as u64
    }
}

impl BlockDevice for RamDisk {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn read_block(&self, block_id: u64, buf: &mut [u8]) -> Result<(), DeviceError> {
        if buf.len() != self.block_size {
            return Err(DeviceError::BufferSize {
                expected: self.block_size,
                actual: buf.len(),
            });
        }
        if block_id >= self.total_blocks() {
            return Err(DeviceError::OutOfRange { block: block_id });
        }

        let start = block_id as usize * self.block_size;
        buf.copy_from_slice(&self.data[start..start + self.block_size]);
        Ok(())
    }
}
