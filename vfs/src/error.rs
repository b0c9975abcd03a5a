use derive_more::Display;

/// 宿主所见的错误，每种对应一个 errno
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[display(fmt = "no such device")]
    NoDevice,
    #[display(fmt = "input/output error")]
    Io,
    #[display(fmt = "invalid argument")]
    InvalidArgument,
    #[display(fmt = "not found")]
    NotFound,
    #[display(fmt = "operation not supported")]
    Unsupported,
}

impl Error {
    pub const fn errno(self) -> i32 {
        match self {
            Self::NoDevice => 6, // ENXIO
            Self::Io => 5, // EIO
            Self::InvalidArgument => 22, // EINVAL
            Self::NotFound => 2, // ENOENT
            Self::Unsupported => 95, // EOPNOTSUPP
        }
    }
}

impl core::error::Error for Error {}
