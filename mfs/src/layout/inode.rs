use binrw::BinRead;
use enumflags2::{bitflags, BitFlags};

/// 磁盘上的 inode 记录
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct DiskInode {
    /// 类型位与权限位
    pub mode: u64,
    /// 格式化时写入的自身编号
    pub ino: u64,
    /// 首个数据块
    pub data_block: u64,
    /// 文件为字节数，目录为子项个数
    pub size: u64,
}

#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    DIR = 0o040000,
    FILE = 0o100000,
}

impl DiskInode {
    /// `mode` 中的类型字段
    const TYPE_MASK: u64 = 0o170000;
    const PERM_MASK: u64 = 0o7777;

    /// 类型字段恰为目录或普通文件之一时有效
    pub fn ty(&self) -> Option<InodeType> {
        BitFlags::<InodeType>::from_bits(self.mode & Self::TYPE_MASK)
            .ok()?
            .exactly_one()
    }

    #[inline]
    pub fn perm(&self) -> u16 {
        (self.mode & Self::PERM_MASK) as u16
    }
}
