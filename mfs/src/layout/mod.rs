//! # 磁盘数据结构层
//!
//! mfs 的磁盘布局（小端序）：
//! 超级块 | inode 表 | 数据块区域
//!
//! 超级块固定位于块0，inode 表的位置与长度由超级块给出，
//! 每个 inode 记录定长 [`INODE_SIZE`](crate::INODE_SIZE) 字节，紧密排列。

mod super_block;
pub use super_block::SuperBlock;

mod inode;
pub use inode::{DiskInode, InodeType};
