//! 单元测试用的设备与镜像

#[allow(dead_code)]
mod image;

use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::{BlockDevice, DeviceError, RamDisk};
use spin::Mutex;

use crate::{INODE_SIZE, MAGIC, ROOT_INODE, VERSION};

pub use self::image::{super_block, Image, DIR, FILE};

/// 记录每次读块的内存设备
pub struct MemDevice {
    disk: RamDisk,
    reads: Mutex<Vec<u64>>,
}

impl MemDevice {
    pub fn new(image: Vec<u8>, block_size: usize) -> Arc<Self> {
        Arc::new(Self {
            disk: RamDisk::new(image, block_size),
            reads: Mutex::default(),
        })
    }

    pub fn reads(&self) -> Vec<u64> {
        self.reads.lock().clone()
    }
}

impl BlockDevice for MemDevice {
    fn block_size(&self) -> usize {
        self.disk.block_size()
    }

    fn read_block(&self, block_id: u64, buf: &mut [u8]) -> Result<(), DeviceError> {
        self.reads.lock().push(block_id);
        self.disk.read_block(block_id, buf)
    }
}
