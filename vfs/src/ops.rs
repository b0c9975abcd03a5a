use crate::{Error, StatFs};

/// 挂载操作表。
///
/// 具体文件系统实现一次，启动时注册给宿主；
/// 宿主保证同一挂载上的 `mount` 与 `unmount` 串行调用。
pub trait FileSystem: Send + Sync {
    /// 一次成功挂载的全部状态
    type Mount: Send + Sync;
    /// 交给宿主包装成 vnode 的节点描述
    type Node;

    /// 打开名为 `dev` 的设备并挂载，根节点通过 `root` 交给宿主
    fn mount(
        &self,
        dev: &str,
        root: &mut dyn VnodeBinder<Self::Node>,
    ) -> Result<Self::Mount, Error>;

    fn unmount(&self, mount: Self::Mount) -> Result<(), Error>;

    fn sync(&self, mount: &Self::Mount) -> Result<(), Error>;

    fn statfs(&self, mount: &Self::Mount) -> StatFs;

    /// 按 inode 编号取节点
    fn vget(&self, mount: &Self::Mount, ino: u64) -> Result<Self::Node, Error>;
}

/// 宿主侧的 vnode 适配器
pub trait VnodeBinder<N> {
    fn bind_root(&mut self, node: N);
}

impl<N, F: FnMut(N)> VnodeBinder<N> for F {
    fn bind_root(&mut self, node: N) {
        self(node)
    }
}
