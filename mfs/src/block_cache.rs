//! # 块缓存层
//!
//! 块设备读写速度一般慢于内存读写速度，因此我们在内存中开辟缓冲区，
//! 把即将读取的块复制到内存中，并尝试返回已缓存的块。
//!
//! 每个挂载拥有自己的 [`BlockCache`]，随挂载创建、随卸载销毁。
//! 同一块号在任意时刻至多对应一个 [`CachedBlock`]；
//! 引用计数即 [`Arc`] 的强引用数减去缓存自身持有的那一份。
//!
//! mfs 只读，缓存中不存在脏块，踢出缓存时无需写回。

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec;
use core::fmt;
use core::ops::Deref;

use block_dev::BlockDevice;
use derive_more::{Add, Display, From, Into};
use log::{trace, warn};
use spin::Mutex;

use crate::MfsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, Display, From, Into)]
#[repr(transparent)]
pub struct BlockId(u64);

impl core::ops::Add<u64> for BlockId {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        self + Self(rhs)
    }
}

/// 内存中的块
pub struct CachedBlock {
    /// 对应的块ID
    id: BlockId,
    /// 缓存的数据
    data: Box<[u8]>,
}

impl CachedBlock {
    fn load(id: BlockId, dev: &dyn BlockDevice) -> Result<Self, MfsError> {
        let mut data = vec![0; dev.block_size()];
        dev.read_block(id.into(), &mut data)
            .map_err(|source| MfsError::Io {
                block: id.into(),
                source,
            })?;

        Ok(Self {
            id,
            data: data.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 取块内 `offset` 处长 `len` 字节的记录，越界视为元数据损坏
    pub fn record(&self, offset: usize, len: usize) -> Result<&[u8], MfsError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(MfsError::Corrupted {
                block: self.id.into(),
                detail: "record crosses the block boundary",
            })
    }
}

impl fmt::Debug for CachedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedBlock")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish()
    }
}

/// [`BlockCache::acquire`] 得到的引用，析构或交还 [`BlockCache::release`] 即释放
#[derive(Debug)]
pub struct BlockRef(Arc<CachedBlock>);

impl Deref for BlockRef {
    type Target = CachedBlock;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct BlockCache {
    /// 底层块设备的引用
    dev: Arc<dyn BlockDevice>,
    /// 块缓存个数的软上限
    capacity: usize,
    blocks: Mutex<BTreeMap<BlockId, Arc<CachedBlock>>>,
}

impl BlockCache {
    pub fn new(dev: Arc<dyn BlockDevice>, capacity: usize) -> Self {
        Self {
            dev,
            capacity,
            blocks: Mutex::default(),
        }
    }

    /// 取得一个块的引用，未命中时从设备读入。
    ///
    /// 查找、读设备与插入在同一把锁内完成，
    /// 因此并发获取同一新块只会读一次设备。
    pub fn acquire(&self, id: BlockId) -> Result<BlockRef, MfsError> {
        let mut blocks = self.blocks.lock();

        // 尝试从缓冲区中读取块
        if let Some(block) = blocks.get(&id) {
            trace!("block cache: hit {id}");
            return Ok(BlockRef(Arc::clone(block)));
        }

        // 读失败时缓存原样不动
        let block = Arc::new(CachedBlock::load(id, &*self.dev)?);
        trace!("block cache: miss {id}, loaded");

        if blocks.len() >= self.capacity {
            Self::evict_idle(&mut blocks);
        }
        blocks.insert(id, Arc::clone(&block));

        Ok(BlockRef(block))
    }

    #[inline]
    pub fn release(&self, block: BlockRef) {
        trace!("block cache: release {}", block.id());
        drop(block);
    }

    /// 块当前被持有的次数，未缓存的块为 0
    pub fn ref_count(&self, id: BlockId) -> usize {
        self.blocks
            .lock()
            .get(&id)
            .map_or(0, |block| Arc::strong_count(block) - 1)
    }

    /// 仍被持有的块数
    pub fn busy(&self) -> usize {
        self.blocks
            .lock()
            .values()
            .filter(|block| Arc::strong_count(block) > 1)
            .count()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // 块缓存调度策略：踢走闲置块
    fn evict_idle(blocks: &mut BTreeMap<BlockId, Arc<CachedBlock>>) {
        // 没有其它引用的才能踢走
        let idle = blocks
            .iter()
            .find_map(|(id, block)| (Arc::strong_count(block) == 1).then_some(*id));

        match idle {
            Some(id) => {
                trace!("block cache: evict {id}");
                blocks.remove(&id);
            }
            None => warn!(
                "block cache: all {} blocks are referenced, growing past capacity",
                blocks.len()
            ),
        }
    }
}

impl fmt::Debug for BlockCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
