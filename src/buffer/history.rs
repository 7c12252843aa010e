//! 編集履歴スタック
//!
//! 木の根そのものをスナップショットとして保持する。ノードは不変なので
//! 根を差し替えるだけで過去の版へ戻れる。

use super::node::Link;

/// undo/redo 用の根スナップショットスタック
#[derive(Debug, Clone)]
pub(crate) struct History {
    undo: Vec<Link>,
    redo: Vec<Link>,
    limit: usize,
    trim_to: usize,
}

impl History {
    pub(crate) fn new(limit: usize, trim_to: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
            trim_to: trim_to.min(limit),
        }
    }

    /// 現在の根を記録し、redo を破棄する
    pub(crate) fn checkpoint(&mut self, root: Link) {
        self.undo.push(root);
        if self.undo.len() > self.limit {
            let dropped = self.undo.len() - self.trim_to;
            self.undo.drain(..dropped);
            log::debug!(
                "undo history exceeded {} entries, dropped {} oldest",
                self.limit,
                dropped
            );
        }
        self.redo.clear();
    }

    /// 直前の根へ戻す。履歴が空なら `false`
    pub(crate) fn undo(&mut self, current: &mut Link) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let displaced = std::mem::replace(current, previous);
        self.redo.push(displaced);
        true
    }

    /// undo を取り消す。redo が空なら `false`
    pub(crate) fn redo(&mut self, current: &mut Link) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let displaced = std::mem::replace(current, next);
        self.undo.push(displaced);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
