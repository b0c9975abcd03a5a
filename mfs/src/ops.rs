use alloc::sync::Arc;

use block_dev::DeviceRegistry;
use vfs::{FileSystem, StatFs, VnodeBinder};

use crate::{InodeDescriptor, MountContext, MountOptions};

/// mfs 的挂载操作表，启动时注册给宿主
pub struct Mfs {
    registry: Arc<dyn DeviceRegistry>,
    options: MountOptions,
}

impl Mfs {
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self::with_options(registry, MountOptions::default())
    }

    pub fn with_options(registry: Arc<dyn DeviceRegistry>, options: MountOptions) -> Self {
        Self { registry, options }
    }

    #[inline]
    pub fn options(&self) -> &MountOptions {
        &self.options
    }
}

impl FileSystem for Mfs {
    type Mount = MountContext;
    type Node = InodeDescriptor;

    fn mount(
        &self,
        dev: &str,
        root: &mut dyn VnodeBinder<InodeDescriptor>,
    ) -> Result<MountContext, vfs::Error> {
        Ok(MountContext::mount(
            &*self.registry,
            dev,
            &self.options,
            root,
        )?)
    }

    fn unmount(&self, mount: MountContext) -> Result<(), vfs::Error> {
        Ok(mount.unmount()?)
    }

    fn sync(&self, mount: &MountContext) -> Result<(), vfs::Error> {
        Ok(mount.sync()?)
    }

    fn statfs(&self, mount: &MountContext) -> StatFs {
        mount.statfs()
    }

    fn vget(&self, mount: &MountContext, ino: u64) -> Result<InodeDescriptor, vfs::Error> {
        Ok(mount.resolve(ino)?)
    }
}
