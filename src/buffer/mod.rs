//! バッファ管理モジュール
//!
//! AVL木ベースのテキストバッファ。文字位置による挿入・削除・参照、
//! 根スナップショットによる undo/redo、行・列の補助、チャンク単位の検索を提供

mod history;
mod navigation;
mod node;
mod search;
pub mod shared;

pub use shared::SharedBuffer;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::file;
use history::History;
use node::{InOrder, Link};
use std::fmt;
use std::path::Path;

/// 位置インデックス付きテキストバッファ
///
/// 位置・長さはすべて文字（`char`）単位。編集は経路複製で行うため、
/// 履歴に残った過去の根は以後の編集の影響を受けない。
#[derive(Debug, Clone)]
pub struct TextBuffer {
    root: Link,
    history: History,
    revision: u64,
}

impl TextBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// 設定の履歴上限を使って作成
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            root: None,
            history: History::new(config.history_limit, config.history_trim_to),
            revision: 0,
        }
    }

    /// 文字列から作成（履歴は空）
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.replace_contents(text);
        buffer
    }

    /// 全文字数
    pub fn len(&self) -> usize {
        node::size(&self.root)
    }

    /// 空かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 編集・undo・redo のたびに増加する版番号
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// 指定位置に文字列を挿入
    ///
    /// 空文字列は何もしない。位置が末尾を超える場合は末尾に追加される
    pub fn insert(&mut self, position: usize, text: &str) {
        if text.is_empty() {
            return;
        }

        self.save_state();
        self.root = Some(node::insert(&self.root, position, text));
        self.revision += 1;
        log::debug!(
            "insert {} chars at {} (size {})",
            text.chars().count(),
            position,
            self.len()
        );
    }

    /// 指定位置から `length` 文字を削除
    ///
    /// 長さ0は何もしない。範囲が末尾を超える分は無視される
    ///
    /// 末尾以降を指した場合もチェックポイントは積むが、内容は変わらないので
    /// 版番号は進めない
    pub fn erase(&mut self, position: usize, length: usize) {
        if length == 0 {
            return;
        }

        self.save_state();
        let (root, erased) = node::erase(&self.root, position, length);
        self.root = root;
        if erased > 0 {
            self.revision += 1;
        }
        log::debug!("erase {} of {} chars at {}", erased, length, position);
    }

    /// 指定範囲のテキストを取得
    pub fn text(&self, start: usize, length: usize) -> String {
        let mut result = String::new();
        let end = start.saturating_add(length);
        node::collect_text(&self.root, start, end, 0, &mut result);
        result
    }

    /// 指定位置の文字を取得（範囲外は `None`）
    pub fn char_at(&self, position: usize) -> Option<char> {
        node::char_at(&self.root, position)
    }

    /// チャンクを文書順に列挙
    pub fn chunks(&self) -> impl Iterator<Item = &str> + '_ {
        InOrder::new(&self.root).map(|node| node.chunk())
    }

    /// 現在の状態を undo スタックに記録
    ///
    /// 挿入・削除の前に自動で呼ばれる
    pub fn save_state(&mut self) {
        self.history.checkpoint(self.root.clone());
    }

    /// 直前の状態へ戻す
    pub fn undo(&mut self) -> bool {
        let applied = self.history.undo(&mut self.root);
        if applied {
            self.revision += 1;
        }
        applied
    }

    /// undo を取り消す
    pub fn redo(&mut self) -> bool {
        let applied = self.history.redo(&mut self.root);
        if applied {
            self.revision += 1;
        }
        applied
    }

    /// undo/redo 履歴をすべて破棄
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// undo 可能か
    pub fn can_undo(&self) -> bool {
        self.history.undo_depth() > 0
    }

    /// redo 可能か
    pub fn can_redo(&self) -> bool {
        self.history.redo_depth() > 0
    }

    /// undo スタックの深さ
    pub fn history_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// ファイル内容でバッファを置き換える
    ///
    /// 履歴は破棄され、読み込み自体は undo の対象にならない
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = file::read_file(path)?;

        self.clear_history();
        self.replace_contents(&content);
        log::info!(
            "loaded {} chars from {}",
            self.len(),
            path.display()
        );
        Ok(())
    }

    /// チャンクを順に書き出してファイルへ保存
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        file::write_chunks(path, self.chunks())?;
        log::info!("saved {} chars to {}", self.len(), path.display());
        Ok(())
    }

    /// AVL条件と文字数の整合性を検証（テスト・デバッグ用）
    pub fn validate(&self) -> bool {
        node::validate(&self.root)
    }

    /// 木構造を文字列として描画（デバッグ用）
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        node::dump(&self.root, 0, &mut out);
        out
    }

    fn replace_contents(&mut self, content: &str) {
        self.root = if content.is_empty() {
            None
        } else {
            Some(node::insert(&None, 0, content))
        };
        self.revision += 1;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn char_to_byte_index(s: &str, char_pos: usize) -> usize {
        s.char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(s.len())
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert!(buffer.validate());
        assert_eq!(buffer.to_string(), "");
    }

    #[test]
    fn test_multiple_inserts() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello");
        buffer.insert(5, " World");
        buffer.insert(11, "!");

        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer.text(0, 12), "Hello World!");
        assert!(buffer.validate());

        buffer.erase(5, 6);
        assert_eq!(buffer.text(0, 5), "Hello");
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello");
        buffer.insert(5, " World");
        buffer.insert(5, " Beautiful");

        assert_eq!(buffer.len(), 21);
        assert_eq!(buffer.text(0, 21), "Hello Beautiful World");
        assert_eq!(buffer.text(6, 9), "Beautiful");
        assert_eq!(buffer.text(16, 5), "World");
    }

    #[test]
    fn test_erase_from_middle() {
        let mut buffer = TextBuffer::from_text("Hello Beautiful World");
        buffer.erase(6, 10);
        assert_eq!(buffer.to_string(), "Hello World");
        assert!(buffer.validate());
    }

    #[test]
    fn test_noop_edits_leave_history_untouched() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.insert(1, "");
        buffer.erase(1, 0);
        assert_eq!(buffer.to_string(), "abc");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_char_access() {
        let buffer = TextBuffer::from_text("Hello World");
        assert_eq!(buffer.char_at(0), Some('H'));
        assert_eq!(buffer.char_at(4), Some('o'));
        assert_eq!(buffer.char_at(10), Some('d'));
        assert_eq!(buffer.char_at(11), None);
    }

    #[test]
    fn test_edge_cases() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello");
        buffer.insert(5, " World");

        buffer.erase(11, 5);
        assert_eq!(buffer.len(), 11);

        buffer.erase(0, 11);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.validate());
    }

    #[test]
    fn test_undo_redo_with_explicit_checkpoint() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello");
        buffer.save_state();
        buffer.insert(5, " World");
        assert_eq!(buffer.len(), 11);

        assert!(buffer.undo());
        assert_eq!(buffer.to_string(), "Hello");

        assert!(buffer.redo());
        assert_eq!(buffer.to_string(), "Hello World");
    }

    #[test]
    fn test_undo_restores_empty_document() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "first");
        assert!(buffer.undo());
        assert!(buffer.is_empty());
        assert!(!buffer.undo());
    }

    #[test]
    fn test_undo_after_later_edits_is_not_corrupted() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "abc");
        buffer.insert(3, "def");
        buffer.insert(1, "XY");
        buffer.erase(0, 2);

        assert!(buffer.undo());
        assert_eq!(buffer.to_string(), "aXYbcdef");
        assert!(buffer.undo());
        assert_eq!(buffer.to_string(), "abcdef");
        assert!(buffer.undo());
        assert_eq!(buffer.to_string(), "abc");
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut buffer = TextBuffer::new();
        let start = buffer.revision();
        buffer.insert(0, "x");
        assert!(buffer.revision() > start);

        let after_insert = buffer.revision();
        buffer.erase(0, 0);
        assert_eq!(buffer.revision(), after_insert);

        buffer.undo();
        assert!(buffer.revision() > after_insert);
    }

    #[test]
    fn test_erase_past_end_keeps_revision() {
        let mut buffer = TextBuffer::from_text("abc");
        let revision = buffer.revision();
        let depth = buffer.history_depth();

        buffer.erase(3, 2);
        buffer.erase(10, 1);
        assert_eq!(buffer.to_string(), "abc");
        assert_eq!(buffer.revision(), revision);
        assert_eq!(buffer.history_depth(), depth + 2);

        buffer.erase(2, 5);
        assert_eq!(buffer.to_string(), "ab");
        assert!(buffer.revision() > revision);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EngineConfig {
            history_limit: 4,
            history_trim_to: 2,
            ..EngineConfig::default()
        };
        let mut buffer = TextBuffer::with_config(&config);
        for _ in 0..5 {
            buffer.insert(0, "a");
        }
        assert_eq!(buffer.history_depth(), 2);
    }

    #[test]
    fn test_large_text_random_access() {
        let buffer = TextBuffer::from_text(&"A".repeat(10_000));
        assert_eq!(buffer.len(), 10_000);
        assert!(buffer.validate());
        for pos in (0..10_000).step_by(97) {
            assert_eq!(buffer.char_at(pos), Some('A'));
        }
    }

    #[test]
    fn test_many_prepends_stay_balanced() {
        let mut buffer = TextBuffer::new();
        for i in 0..1000 {
            buffer.insert(0, "A");
            if i % 2 == 0 {
                buffer.erase(0, 1);
            }
        }
        assert!(buffer.validate());
        assert_eq!(buffer.len(), 500);
    }

    #[test]
    fn test_utf8_support() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "こんにちは");
        buffer.insert(2, "!");
        assert_eq!(buffer.to_string(), "こん!にちは");
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.char_at(2), Some('!'));
    }

    proptest! {
        #[test]
        fn prop_matches_string_model(ops in prop::collection::vec((any::<bool>(), 0usize..64, "[a-zあ-ん\n]{0,6}"), 0..40)) {
            let mut buffer = TextBuffer::new();
            let mut model = String::new();

            for (is_insert, pos, payload) in ops {
                let len = model.chars().count();
                if is_insert {
                    let pos = pos % (len + 1);
                    buffer.insert(pos, &payload);
                    model.insert_str(char_to_byte_index(&model, pos), &payload);
                } else {
                    let count = payload.chars().count();
                    buffer.erase(pos, count);
                    if pos < len && count > 0 {
                        let end = (pos + count).min(len);
                        let start_byte = char_to_byte_index(&model, pos);
                        let end_byte = char_to_byte_index(&model, end);
                        model.replace_range(start_byte..end_byte, "");
                    }
                }
                prop_assert!(buffer.validate());
            }

            prop_assert_eq!(buffer.to_string(), model.clone());
            prop_assert_eq!(buffer.len(), model.chars().count());
        }
    }
}
