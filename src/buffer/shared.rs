//! スレッド間で共有するバッファハンドル

use super::TextBuffer;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// 読み書きロックで保護された `TextBuffer`
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<RwLock<TextBuffer>>,
}

impl SharedBuffer {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(buffer)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TextBuffer> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TextBuffer> {
        self.inner.write()
    }

    /// 現在の版を複製して取得
    ///
    /// 木は不変ノードの共有なので、複製は根と履歴のハンドルだけで済む
    pub fn snapshot(&self) -> TextBuffer {
        self.inner.read().clone()
    }
}

impl From<TextBuffer> for SharedBuffer {
    fn from(buffer: TextBuffer) -> Self {
        Self::new(buffer)
    }
}
