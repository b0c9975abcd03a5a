//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘、光盘、U盘等；
//! [`BlockDevice`] 就是对读块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 设备由宿主持有，文件系统通过 [`DeviceRegistry`] 按名字打开，
//! 得到的 [`DeviceHandle`] 在析构时关闭设备，且只关闭一次。

#![no_std]

extern crate alloc;

mod error;
mod ram_disk;

use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::ops::Deref;

pub use self::{error::DeviceError, ram_disk::RamDisk};

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any {
    /// 每块的字节数
    fn block_size(&self) -> usize;

    /// 读出一整块，`buf` 的长度必须等于 [`BlockDevice::block_size`]
    fn read_block(&self, block_id: u64, buf: &mut [u8]) -> Result<(), DeviceError>;

    /// 宿主关闭设备，由 [`DeviceHandle`] 调用
    fn close(&self) {}
}

/// 按名字查找并打开块设备
pub trait DeviceRegistry: Send + Sync {
    fn open(&self, name: &str) -> Result<Arc<dyn BlockDevice>, DeviceError>;
}

/// 已打开的设备。
///
/// 析构即关闭，故每次成功的 [`DeviceHandle::open`] 恰好对应一次 [`BlockDevice::close`]。
pub struct DeviceHandle {
    name: String,
    dev: Arc<dyn BlockDevice>,
}

impl DeviceHandle {
    pub fn open(registry: &dyn DeviceRegistry, name: &str) -> Result<Self, DeviceError> {
        let dev = registry.open(name)?;
        Ok(Self {
            name: name.into(),
            dev,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 底层设备的共享引用，供块缓存读块使用
    #[inline]
    pub fn device(&self) -> &Arc<dyn BlockDevice> {
        &self.dev
    }
}

impl Deref for DeviceHandle {
    type Target = dyn BlockDevice;

    fn deref(&self) -> &Self::Target {
        &*self.dev
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("name", &self.name)
            .field("block_size", &self.dev.block_size())
            .finish()
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.dev.close();
    }
}
