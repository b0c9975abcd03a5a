//! mfs 镜像构造器，单元测试与集成测试共用

use alloc::vec;
use alloc::vec::Vec;

use super::{INODE_SIZE, MAGIC, ROOT_INODE, VERSION};

pub const DIR: u64 = 0o040755;
pub const FILE: u64 = 0o100644;

/// 按磁盘格式排列的超级块字节
pub fn super_block(magic: u64, version: u64, block_size: u64, table: u64, table_blocks: u64) -> Vec<u8> {
    le_fields(&[magic, version, block_size, table, table_blocks])
}

fn le_fields(fields: &[u64]) -> Vec<u8> {
    fields.iter().flat_map(|field| field.to_le_bytes()).collect()
}

/// 超级块 | inode 表（从块1开始） | 一个数据块
///
/// 默认带一个根目录，数据块紧随 inode 表。
pub struct Image {
    magic: u64,
    version: u64,
    block_size: usize,
    declared_block_size: u64,
    table_blocks: u64,
    /// (ino, mode, data_block, size)
    inodes: Vec<(u64, u64, u64, u64)>,
}

impl Image {
    pub fn new(block_size: usize, table_blocks: u64) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            block_size,
            declared_block_size: block_size as u64,
            table_blocks,
            inodes: vec![(ROOT_INODE, DIR, 1 + table_blocks, 0)],
        }
    }

    pub fn magic(mut self, magic: u64) -> Self {
        self.magic = magic;
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// 超级块中声明的块大小，默认与设备一致
    pub fn declared_block_size(mut self, block_size: u64) -> Self {
        self.declared_block_size = block_size;
        self
    }

    /// 写入一条 inode 记录，同号的旧记录被替换
    pub fn inode(mut self, ino: u64, mode: u64, data_block: u64, size: u64) -> Self {
        self.inodes.retain(|&(old, ..)| old != ino);
        self.inodes.push((ino, mode, data_block, size));
        self
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn build(&self) -> Vec<u8> {
        let total = 1 + self.table_blocks as usize + 1;
        let mut image = vec![0u8; total * self.block_size];

        let header = super_block(
            self.magic,
            self.version,
            self.declared_block_size,
            1,
            self.table_blocks,
        );
        image[..header.len()].copy_from_slice(&header);

        for &(ino, mode, data_block, size) in &self.inodes {
            let start = self.block_size + (ino as usize - 1) * INODE_SIZE;
            image[start..start + INODE_SIZE].copy_from_slice(&le_fields(&[mode, ino, data_block, size]));
        }

        image
    }
}
