//! 宿主虚拟文件系统与具体文件系统之间的约定：
//! 挂载操作表、根 vnode 的绑定以及统计信息。

#![no_std]

mod dirent;
mod error;
mod ops;
mod stat;

pub use self::{
    dirent::DirEntryType,
    error::Error,
    ops::{FileSystem, VnodeBinder},
    stat::{Stat, StatFs},
};
