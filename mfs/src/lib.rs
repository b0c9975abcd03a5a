#![no_std]

extern crate alloc;

/* mfs 的整体架构，自上而下 */

// 挂载操作表：注册给宿主的 vfs::FileSystem 实现
mod ops;

// 挂载控制层：挂载、卸载、统计，持有挂载期间的全部资源
mod mount;

// 索引节点层：把 inode 编号解析为 inode 描述
mod inode;

// 磁盘数据结构层：表示磁盘文件系统的数据结构
mod layout;

// 块缓存层：内存上的磁盘块数据缓存
mod block_cache;

mod error;

#[cfg(test)]
mod testing;

pub use self::{
    block_cache::{BlockCache, BlockId, BlockRef, CachedBlock},
    error::MfsError,
    inode::{InodeDescriptor, InodeKind},
    layout::SuperBlock,
    mount::{MountContext, MountOptions, MountState},
    ops::Mfs,
};

pub const MAGIC: u64 = 0xDEAD_BEEF;
/// 本实现唯一支持的磁盘格式版本
pub const VERSION: u64 = 1;

/// 超级块所在块
pub const SUPER_BLOCK_ID: u64 = 0;
pub const SUPER_BLOCK_SIZE: usize = 40;

pub const ROOT_INODE: u64 = 1;
pub const INODE_SIZE: usize = 32;

pub const FILENAME_MAX_LEN: u64 = 63;
