#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use block_dev::{BlockDevice, DeviceError, DeviceRegistry, RamDisk};
use mfs::{INODE_SIZE, MAGIC, ROOT_INODE, VERSION};

#[path = "../../src/testing/image.rs"]
mod image;

pub use self::image::{Image, DIR, FILE};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 统计读块与关闭次数的设备，可指定一个读必然失败的块
pub struct TestDevice {
    disk: RamDisk,
    broken: Option<u64>,
    reads: Mutex<Vec<u64>>,
    closes: AtomicUsize,
}

impl TestDevice {
    pub fn new(image: Vec<u8>, block_size: usize) -> Arc<Self> {
        Self::with_broken(image, block_size, None)
    }

    pub fn with_broken(image: Vec<u8>, block_size: usize, broken: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            disk: RamDisk::new(image, block_size),
            broken,
            reads: Mutex::default(),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> Vec<u64> {
        self.reads.lock().unwrap().clone()
    }

    pub fn reads_of(&self, block_id: u64) -> usize {
        self.reads().iter().filter(|&&id| id == block_id).count()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl BlockDevice for TestDevice {
    fn block_size(&self) -> usize {
        self.disk.block_size()
    }

    fn read_block(&self, block_id: u64, buf: &mut [u8]) -> Result<(), DeviceError> {
        self.reads.lock().unwrap().push(block_id);
        if self.broken == Some(block_id) {
            return Err(DeviceError::Io { block: block_id });
        }
        self.disk.read_block(block_id, buf)
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct Registry {
    devices: HashMap<String, Arc<TestDevice>>,
}

impl Registry {
    pub fn with(mut self, name: &str, dev: Arc<TestDevice>) -> Self {
        self.devices.insert(name.to_owned(), dev);
        self
    }
}

impl DeviceRegistry for Registry {
    fn open(&self, name: &str) -> Result<Arc<dyn BlockDevice>, DeviceError> {
        self.devices
            .get(name)
            .map(|dev| Arc::clone(dev) as Arc<dyn BlockDevice>)
            .ok_or(DeviceError::NotFound)
    }
}

impl Image {
    pub fn device(&self) -> Arc<TestDevice> {
        TestDevice::new(self.build(), self.block_size())
    }
}
