//! # 索引节点层
//!
//! 把 inode 编号解析成自持的 [`InodeDescriptor`]。
//! 不保留 inode 缓存，每次解析都经过块缓存重新读取。

use binrw::io::Cursor;
use binrw::BinRead;
use log::warn;
use vfs::{DirEntryType, Stat};

use crate::block_cache::{BlockCache, BlockId};
use crate::layout::{DiskInode, InodeType, SuperBlock};
use crate::{MfsError, INODE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    File,
    Directory,
}

impl From<InodeType> for InodeKind {
    fn from(ty: InodeType) -> Self {
        match ty {
            InodeType::DIR => Self::Directory,
            InodeType::FILE => Self::File,
        }
    }
}

impl From<InodeKind> for DirEntryType {
    fn from(kind: InodeKind) -> Self {
        match kind {
            InodeKind::File => Self::Regular,
            InodeKind::Directory => Self::Directory,
        }
    }
}

/// 一个文件或目录的元信息，解析后归调用者所有
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeDescriptor {
    ino: u64,
    kind: InodeKind,
    perm: u16,
    data_block: u64,
    /// 文件为字节数，目录为子项个数
    size: u64,
    links: u32,
}

impl InodeDescriptor {
    #[inline]
    pub fn ino(&self) -> u64 {
        self.ino
    }

    #[inline]
    pub fn kind(&self) -> InodeKind {
        self.kind
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    #[inline]
    pub fn perm(&self) -> u16 {
        self.perm
    }

    #[inline]
    pub fn data_block(&self) -> u64 {
        self.data_block
    }

    /// 文件的字节数
    pub fn file_size(&self) -> Option<u64> {
        (!self.is_dir()).then_some(self.size)
    }

    /// 目录的子项个数
    pub fn children(&self) -> Option<u64> {
        self.is_dir().then_some(self.size)
    }

    /// 磁盘格式没有硬链接计数，恒为1
    #[inline]
    pub fn links(&self) -> u32 {
        self.links
    }

    /// 供宿主填写 vnode 属性
    pub fn stat(&self, block_size: u64) -> Stat {
        let (size, blocks) = match self.kind {
            // 目录的子项记录存放在一个数据块里
            InodeKind::Directory => (block_size, 1),
            InodeKind::File => (
                self.size,
                self.size.checked_div(block_size).map_or(0, |full| {
                    full + u64::from(self.size % block_size != 0)
                }),
            ),
        };

        Stat {
            ino: self.ino,
            mode: self.kind.into(),
            perm: self.perm,
            links: self.links,
            block_size,
            blocks,
            size,
        }
    }
}

/// 通过编号获取 inode 在磁盘上的位置：**块ID**以及**块内偏移**
///
/// 编号从1开始，超出 inode 表的编号无效。
pub fn disk_inode_pos(sb: &SuperBlock, ino: u64) -> Result<(BlockId, usize), MfsError> {
    let invalid = MfsError::InvalidInodeNumber(ino);
    let inodes_per_block = sb.block_size() / INODE_SIZE as u64;
    if inodes_per_block == 0 {
        return Err(invalid);
    }

    let index = ino.checked_sub(1).ok_or(invalid.clone())?;
    let table_index = index / inodes_per_block;
    if table_index >= sb.inode_table_blocks() {
        return Err(invalid);
    }

    let block_id = sb
        .inode_table_block()
        .checked_add(table_index)
        .ok_or(invalid)?;
    let block_offset = (index % inodes_per_block) as usize * INODE_SIZE;

    Ok((block_id.into(), block_offset))
}

pub fn resolve(cache: &BlockCache, sb: &SuperBlock, ino: u64) -> Result<InodeDescriptor, MfsError> {
    let (block_id, block_offset) = disk_inode_pos(sb, ino)?;

    let block = cache.acquire(block_id)?;
    let disk_inode = block
        .record(block_offset, INODE_SIZE)
        .and_then(|record| {
            DiskInode::read_le(&mut Cursor::new(record)).map_err(|_| MfsError::Corrupted {
                block: block_id.into(),
                detail: "truncated inode",
            })
        });
    cache.release(block);
    let disk_inode = disk_inode?;

    let kind = disk_inode.ty().ok_or(MfsError::Corrupted {
        block: block_id.into(),
        detail: "unknown inode type",
    })?;
    if disk_inode.ino != ino {
        warn!(
            "mfs: inode {ino} records number {} at block {block_id}",
            disk_inode.ino
        );
    }

    Ok(InodeDescriptor {
        ino,
        kind: kind.into(),
        perm: disk_inode.perm(),
        data_block: disk_inode.data_block,
        size: disk_inode.size,
        links: 1,
    })
}
