use crate::DirEntryType;

/// vnode 的属性
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C, align(32))]
pub struct Stat {
    /// Inode number
    pub ino: u64,
    pub mode: DirEntryType,
    /// Permission bits
    pub perm: u16,
    pub links: u32,
    /// Optimal I/O block size
    pub block_size: u64,
    /// Occupying blocks
    pub blocks: u64,
    /// File size
    pub size: u64,
}

/// 文件系统统计信息，字段对应 `struct statfs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatFs {
    /// f_bsize
    pub block_size: u64,
    /// f_blocks
    pub blocks: u64,
    /// f_bfree
    pub blocks_free: u64,
    /// f_bavail
    pub blocks_avail: u64,
    /// f_files
    pub files: u64,
    /// f_ffree
    pub files_free: u64,
    /// f_namelen
    pub name_max: u64,
}
