//! # 挂载控制层
//!
//! 打开设备、校验超级块、解析根 inode，得到 [`MountContext`]；
//! 挂载失败时所有已取得的资源随作用域一并释放，设备恰好关闭一次。

use block_dev::{DeviceHandle, DeviceRegistry};
use log::{debug, error, info, trace, warn};
use vfs::{StatFs, VnodeBinder};

use crate::block_cache::{BlockCache, BlockId};
use crate::inode::{self, InodeDescriptor};
use crate::layout::SuperBlock;
use crate::{MfsError, INODE_SIZE, ROOT_INODE, SUPER_BLOCK_ID, SUPER_BLOCK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountState {
    #[default]
    Unmounted,
    Opening,
    Validating,
    Ready,
    Unmounting,
    /// 与从未挂载等价
    Closed,
}

impl MountState {
    pub const fn can_enter(self, next: Self) -> bool {
        use MountState::*;

        matches!(
            (self, next),
            (Unmounted, Opening)
                | (Opening, Validating)
                | (Validating, Ready)
                | (Ready, Unmounting)
                | (Unmounting, Closed)
                // 挂载失败，回滚
                | (Opening | Validating | Ready, Closed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
    /// 块缓存个数的软上限
    pub cache_capacity: usize,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self { cache_capacity: 16 }
    }
}

/// 一次成功挂载的全部状态。
///
/// 字段按声明顺序析构：块缓存先于设备释放。
#[derive(Debug)]
pub struct MountContext {
    cache: BlockCache,
    super_block: SuperBlock,
    state: MountState,
    device: DeviceHandle,
}

impl MountContext {
    /// 挂载名为 `dev_name` 的设备，根 inode 交给 `binder`
    pub fn mount(
        registry: &dyn DeviceRegistry,
        dev_name: &str,
        options: &MountOptions,
        binder: &mut dyn VnodeBinder<InodeDescriptor>,
    ) -> Result<Self, MfsError> {
        let mut state = MountState::default();
        let name = dev_name.strip_prefix("/dev/").unwrap_or(dev_name);

        enter(&mut state, MountState::Opening);
        let device = match DeviceHandle::open(registry, name) {
            Ok(device) => device,
            Err(err) => {
                error!("mfs: error opening device {name}: {err}");
                enter(&mut state, MountState::Closed);
                return Err(MfsError::DeviceOpen(err));
            }
        };

        enter(&mut state, MountState::Validating);
        let cache = BlockCache::new(device.device().clone(), options.cache_capacity);
        let super_block = match load_super_block(&cache, device.block_size()) {
            Ok(super_block) => super_block,
            Err(err) => {
                error!("mfs: cannot mount {name}: {err}");
                enter(&mut state, MountState::Closed);
                return Err(err);
            }
        };

        let mut mount = Self {
            cache,
            super_block,
            state,
            device,
        };
        mount.enter(MountState::Ready);

        let root = match mount.resolve(ROOT_INODE) {
            Ok(root) => root,
            Err(err) => {
                error!("mfs: error reading root inode of {name}: {err}");
                mount.enter(MountState::Closed);
                return Err(err);
            }
        };
        binder.bind_root(root);

        info!("mfs: mounted {name}");
        Ok(mount)
    }

    pub fn resolve(&self, ino: u64) -> Result<InodeDescriptor, MfsError> {
        inode::resolve(&self.cache, &self.super_block, ino)
    }

    pub fn statfs(&self) -> StatFs {
        let sb = &self.super_block;

        StatFs {
            block_size: sb.block_size(),
            // 总块数未知，沿用 inode 表块数
            blocks: sb.inode_table_blocks(),
            // 只读，没有空闲块
            blocks_free: 0,
            blocks_avail: 0,
            // 应为 inode 总数
            files: sb.inode_table_blocks(),
            files_free: 0,
            name_max: sb.name_max_len(),
        }
    }

    /// 只读文件系统没有需要写回的数据
    pub fn sync(&self) -> Result<(), MfsError> {
        Ok(())
    }

    pub fn unmount(mut self) -> Result<(), MfsError> {
        self.enter(MountState::Unmounting);

        let busy = self.cache.busy();
        if busy > 0 {
            warn!(
                "mfs: unmounting {} with {busy} cached blocks still referenced",
                self.device.name()
            );
        }

        self.enter(MountState::Closed);
        info!("mfs: unmounted {}", self.device.name());
        // 析构依次释放块缓存、超级块并关闭设备
        Ok(())
    }

    #[inline]
    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    #[inline]
    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    #[inline]
    pub fn state(&self) -> MountState {
        self.state
    }

    #[inline]
    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    #[inline]
    fn enter(&mut self, next: MountState) {
        enter(&mut self.state, next);
    }
}

fn enter(state: &mut MountState, next: MountState) {
    debug_assert!(
        state.can_enter(next),
        "illegal mount transition {state:?} -> {next:?}"
    );
    trace!("mfs: {state:?} -> {next:?}");
    *state = next;
}

fn load_super_block(cache: &BlockCache, device_block_size: usize) -> Result<SuperBlock, MfsError> {
    // 块0放得下超级块、每块至少放得下一个 inode，才值得去读
    if device_block_size < SUPER_BLOCK_SIZE.max(INODE_SIZE) {
        return Err(MfsError::BadGeometry {
            block_size: device_block_size as u64,
            device_block_size,
        });
    }

    let block = cache.acquire(BlockId::from(SUPER_BLOCK_ID))?;
    let super_block = SuperBlock::validate(block.data());
    cache.release(block);
    let super_block = super_block?;

    debug!("mfs: superblock version: {:#018x}", super_block.version());
    debug!("mfs: magic:              {:#018x}", super_block.magic());
    debug!("mfs: block size:         {:#018x}", super_block.block_size());
    debug!("mfs: inode block:        {:#018x}", super_block.inode_table_block());
    debug!("mfs: inode blocks:       {:#018x}", super_block.inode_table_blocks());

    if usize::try_from(super_block.block_size()) != Ok(device_block_size) {
        return Err(MfsError::BadGeometry {
            block_size: super_block.block_size(),
            device_block_size,
        });
    }

    Ok(super_block)
}
