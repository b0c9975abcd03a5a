use binrw::io::Cursor;
use binrw::{BinRead, BinReaderExt};

use crate::{MfsError, FILENAME_MAX_LEN, MAGIC, SUPER_BLOCK_ID, VERSION};

/// 超级块：
/// - 提供文件系统合法性校验；
/// - 定位 inode 表。
///
/// 只能由 [`SuperBlock::validate`] 构造，构造后不再改变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    /// 魔数：用于校验文件系统合法性
    magic: u64,
    version: u64,
    block_size: u64,
    /// inode 表的起始块
    inode_table_block: u64,
    /// inode 表占据块数
    inode_table_blocks: u64,
    name_max_len: u64,
}

/// 魔数与版本之后的字段，校验通过前不解读
#[derive(BinRead)]
#[br(little)]
struct Geometry {
    block_size: u64,
    inode_table_block: u64,
    inode_table_blocks: u64,
}

impl SuperBlock {
    /// 校验块0的原始字节并复制出超级块。
    ///
    /// 先比对魔数，不符则立即返回，其余字段一概不读；再比对版本。
    /// 不足8字节、读不出魔数的输入按魔数为0处理。
    pub fn validate(bytes: &[u8]) -> Result<Self, MfsError> {
        let mut reader = Cursor::new(bytes);

        let magic: u64 = reader.read_le().unwrap_or(0);
        if magic != MAGIC {
            return Err(MfsError::BadMagic {
                expected: MAGIC,
                found: magic,
            });
        }

        let version: u64 = reader.read_le().map_err(truncated)?;
        if version != VERSION {
            return Err(MfsError::BadVersion {
                expected: VERSION,
                found: version,
            });
        }

        let Geometry {
            block_size,
            inode_table_block,
            inode_table_blocks,
        } = reader.read_le().map_err(truncated)?;

        Ok(Self {
            magic,
            version,
            block_size,
            inode_table_block,
            inode_table_blocks,
            name_max_len: FILENAME_MAX_LEN,
        })
    }

    #[inline]
    pub fn magic(&self) -> u64 {
        self.magic
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    #[inline]
    pub fn inode_table_block(&self) -> u64 {
        self.inode_table_block
    }

    #[inline]
    pub fn inode_table_blocks(&self) -> u64 {
        self.inode_table_blocks
    }

    #[inline]
    pub fn name_max_len(&self) -> u64 {
        self.name_max_len
    }
}

fn truncated(_: binrw::Error) -> MfsError {
    MfsError::Corrupted {
        block: SUPER_BLOCK_ID,
        detail: "truncated superblock",
    }
}
