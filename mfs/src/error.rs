use block_dev::DeviceError;
use derive_more::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum MfsError {
    #[display(fmt = "failed to open device: {}", _0)]
    DeviceOpen(DeviceError),

    #[display(fmt = "failed to read block {}: {}", block, source)]
    Io { block: u64, source: DeviceError },

    /// 不是 mfs 卷
    #[display(fmt = "bad magic: expected {:#018x}, found {:#018x}", expected, found)]
    BadMagic { expected: u64, found: u64 },

    #[display(fmt = "incompatible version: expected {}, found {}", expected, found)]
    BadVersion { expected: u64, found: u64 },

    /// 超级块声明的块大小与设备不一致，或设备块小到放不下超级块与 inode
    #[display(
        fmt = "unusable block size {} on a device with {}-byte blocks",
        block_size,
        device_block_size
    )]
    BadGeometry {
        block_size: u64,
        device_block_size: usize,
    },

    #[display(fmt = "inode {} is out of range", _0)]
    InvalidInodeNumber(u64),

    #[display(fmt = "corrupted metadata at block {}: {}", block, detail)]
    Corrupted { block: u64, detail: &'static str },
}

impl MfsError {
    pub fn errno(&self) -> i32 {
        vfs::Error::from(self).errno()
    }
}

impl From<&MfsError> for vfs::Error {
    fn from(err: &MfsError) -> Self {
        match err {
            MfsError::DeviceOpen(_) => Self::NoDevice,
            MfsError::Io { .. } | MfsError::Corrupted { .. } => Self::Io,
            MfsError::BadMagic { .. } | MfsError::BadGeometry { .. } => Self::InvalidArgument,
            MfsError::BadVersion { .. } => Self::Unsupported,
            MfsError::InvalidInodeNumber(_) => Self::NotFound,
        }
    }
}

impl From<MfsError> for vfs::Error {
    #[inline]
    fn from(err: MfsError) -> Self {
        Self::from(&err)
    }
}

impl core::error::Error for MfsError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::DeviceOpen(source) | Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display() {
        let bad_magic = MfsError::BadMagic {
            expected: crate::MAGIC,
            found: 7,
        };
        assert_eq!(
            "bad magic: expected 0x00000000deadbeef, found 0x0000000000000007",
            bad_magic.to_string()
        );

        let io = MfsError::Io {
            block: 3,
            source: DeviceError::OutOfRange { block: 3 },
        };
        assert_eq!(
            "failed to read block 3: block 3 is beyond the end of the device",
            io.to_string()
        );
    }

    #[test]
    fn errno() {
        let bad_magic = MfsError::BadMagic {
            expected: crate::MAGIC,
            found: 0,
        };
        let bad_version = MfsError::BadVersion {
            expected: crate::VERSION,
            found: 2,
        };
        let corrupted = MfsError::Corrupted {
            block: 1,
            detail: "unknown inode type",
        };

        assert_eq!(6, MfsError::DeviceOpen(DeviceError::NotFound).errno());
        assert_eq!(22, bad_magic.errno());
        assert_eq!(95, bad_version.errno());
        assert_eq!(2, MfsError::InvalidInodeNumber(0).errno());
        assert_eq!(5, corrupted.errno());
    }
}
