//! AVL木ノード
//!
//! チャンク文字列と部分木の文字数・高さを保持する不変ノード。
//! 編集は根から編集箇所までの経路だけを複製し、触れない部分木は `Arc` で共有する。

use std::fmt::Write as _;
use std::sync::Arc;

/// 部分木への参照（空の部分木は `None`）
pub(crate) type Link = Option<Arc<Node>>;

/// 木のノード
#[derive(Debug)]
pub(crate) struct Node {
    /// このノードが持つテキスト片
    chunk: Arc<str>,
    /// `chunk` の文字数
    chunk_len: usize,
    /// 部分木の高さ（葉は1）
    height: usize,
    /// 部分木全体の文字数
    size: usize,
    left: Link,
    right: Link,
}

impl Node {
    fn build(chunk: Arc<str>, left: Link, right: Link) -> Arc<Node> {
        let chunk_len = chunk.chars().count();
        Self::build_with_len(chunk, chunk_len, left, right)
    }

    fn build_with_len(chunk: Arc<str>, chunk_len: usize, left: Link, right: Link) -> Arc<Node> {
        let height = 1 + height(&left).max(height(&right));
        let size = chunk_len + size(&left) + size(&right);
        Arc::new(Node {
            chunk,
            chunk_len,
            height,
            size,
            left,
            right,
        })
    }

    /// 新しい葉ノード
    pub(crate) fn leaf(text: &str) -> Arc<Node> {
        Self::build(Arc::from(text), None, None)
    }

    /// チャンクを共有したまま子を差し替えたノード
    fn with_children(&self, left: Link, right: Link) -> Arc<Node> {
        Self::build_with_len(self.chunk.clone(), self.chunk_len, left, right)
    }

    /// 子を共有したままチャンクを差し替えたノード
    fn with_chunk(&self, chunk: String) -> Arc<Node> {
        Self::build(Arc::from(chunk), self.left.clone(), self.right.clone())
    }

    pub(crate) fn chunk(&self) -> &str {
        &self.chunk
    }

    pub(crate) fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

pub(crate) fn size(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// 文字位置をバイト位置に変換（末尾を超える場合は文字列長）
pub(crate) fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(idx, _)| idx)
}

/// 文字単位でスライスを取得
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = start_byte + byte_offset(&text[start_byte..], end.saturating_sub(start));
    &text[start_byte..end_byte]
}

fn rotate_right(node: &Arc<Node>) -> Arc<Node> {
    let Some(pivot) = &node.left else {
        return node.clone();
    };
    let lowered = node.with_children(pivot.right.clone(), node.right.clone());
    pivot.with_children(pivot.left.clone(), Some(lowered))
}

fn rotate_left(node: &Arc<Node>) -> Arc<Node> {
    let Some(pivot) = &node.right else {
        return node.clone();
    };
    let lowered = node.with_children(node.left.clone(), pivot.left.clone());
    pivot.with_children(Some(lowered), pivot.right.clone())
}

/// AVL条件を回復する
fn rebalance(node: Arc<Node>) -> Arc<Node> {
    let balance = node.balance_factor();

    if balance > 1 {
        if let Some(left) = &node.left {
            // Left-Left
            if left.balance_factor() >= 0 {
                return rotate_right(&node);
            }
            // Left-Right
            let rotated = node.with_children(Some(rotate_left(left)), node.right.clone());
            return rotate_right(&rotated);
        }
    }

    if balance < -1 {
        if let Some(right) = &node.right {
            // Right-Right
            if right.balance_factor() <= 0 {
                return rotate_left(&node);
            }
            // Right-Left
            let rotated = node.with_children(node.left.clone(), Some(rotate_right(right)));
            return rotate_left(&rotated);
        }
    }

    node
}

/// `position` に `text` を挿入した新しい部分木を返す
pub(crate) fn insert(link: &Link, position: usize, text: &str) -> Arc<Node> {
    let Some(node) = link else {
        return Node::leaf(text);
    };

    let left_size = size(&node.left);
    let rebuilt = if position <= left_size {
        node.with_children(Some(insert(&node.left, position, text)), node.right.clone())
    } else if position <= left_size + node.chunk_len {
        let at = byte_offset(&node.chunk, position - left_size);
        let mut spliced = String::with_capacity(node.chunk.len() + text.len());
        spliced.push_str(&node.chunk[..at]);
        spliced.push_str(text);
        spliced.push_str(&node.chunk[at..]);
        node.with_chunk(spliced)
    } else {
        let local = position - left_size - node.chunk_len;
        node.with_children(node.left.clone(), Some(insert(&node.right, local, text)))
    };

    rebalance(rebuilt)
}

/// `position` から最大 `length` 文字を削除した部分木と、実際に削除した文字数を返す
///
/// 左部分木で削除しきれなかった分はこのチャンク、さらに右部分木へ持ち越す。
/// 空になったチャンクのノードは残す。
pub(crate) fn erase(link: &Link, position: usize, length: usize) -> (Link, usize) {
    let Some(node) = link else {
        return (None, 0);
    };
    if length == 0 || position >= node.size {
        return (link.clone(), 0);
    }

    let left_size = size(&node.left);

    let (left, from_left) = if position < left_size {
        erase(&node.left, position, length)
    } else {
        (node.left.clone(), 0)
    };
    let mut remaining = length - from_left;

    // 左部分木から続く削除はチャンク先頭から始まる
    let chunk_start = position.saturating_sub(left_size);
    let mut chunk = None;
    let mut from_chunk = 0;
    if remaining > 0 && chunk_start < node.chunk_len {
        let chunk_end = (chunk_start + remaining).min(node.chunk_len);
        let start_byte = byte_offset(&node.chunk, chunk_start);
        let end_byte = byte_offset(&node.chunk, chunk_end);
        let mut kept = String::with_capacity(node.chunk.len() - (end_byte - start_byte));
        kept.push_str(&node.chunk[..start_byte]);
        kept.push_str(&node.chunk[end_byte..]);
        chunk = Some(kept);
        from_chunk = chunk_end - chunk_start;
        remaining -= from_chunk;
    }

    let (right, from_right) = if remaining > 0 {
        erase(&node.right, chunk_start.saturating_sub(node.chunk_len), remaining)
    } else {
        (node.right.clone(), 0)
    };

    let erased = from_left + from_chunk + from_right;
    if erased == 0 {
        return (link.clone(), 0);
    }

    let rebuilt = match chunk {
        Some(kept) => Node::build_with_len(
            Arc::from(kept),
            node.chunk_len - from_chunk,
            left,
            right,
        ),
        None => node.with_children(left, right),
    };

    (Some(rebalance(rebuilt)), erased)
}

/// 文字位置の文字を取得
pub(crate) fn char_at(link: &Link, position: usize) -> Option<char> {
    let mut current = link.as_ref()?;
    let mut position = position;

    loop {
        if position >= current.size {
            return None;
        }
        let left_size = size(&current.left);
        if position < left_size {
            current = current.left.as_ref()?;
        } else if position < left_size + current.chunk_len {
            return current.chunk.chars().nth(position - left_size);
        } else {
            position -= left_size + current.chunk_len;
            current = current.right.as_ref()?;
        }
    }
}

/// `[start, end)` と重なるチャンク部分を `out` に追加する
///
/// `offset` はこの部分木の先頭の全体位置
pub(crate) fn collect_text(link: &Link, start: usize, end: usize, offset: usize, out: &mut String) {
    let Some(node) = link else {
        return;
    };
    if offset >= end || offset + node.size <= start {
        return;
    }

    let left_size = size(&node.left);
    collect_text(&node.left, start, end, offset, out);

    let chunk_offset = offset + left_size;
    let chunk_end = chunk_offset + node.chunk_len;
    if chunk_offset < end && chunk_end > start {
        let local_start = start.saturating_sub(chunk_offset);
        let local_end = end.min(chunk_end) - chunk_offset;
        out.push_str(char_slice(&node.chunk, local_start, local_end));
    }

    collect_text(&node.right, start, end, chunk_end, out);
}

/// 平衡条件・高さ・文字数の整合性を再帰的に検証
pub(crate) fn validate(link: &Link) -> bool {
    let Some(node) = link else {
        return true;
    };

    let balance = node.balance_factor();
    if !(-1..=1).contains(&balance) {
        return false;
    }
    if node.height != 1 + height(&node.left).max(height(&node.right)) {
        return false;
    }
    if node.chunk_len != node.chunk.chars().count() {
        return false;
    }
    if node.size != node.chunk_len + size(&node.left) + size(&node.right) {
        return false;
    }

    validate(&node.left) && validate(&node.right)
}

/// 木を横倒しで描画（右部分木が上）
pub(crate) fn dump(link: &Link, depth: usize, out: &mut String) {
    let Some(node) = link else {
        return;
    };
    dump(&node.right, depth + 1, out);
    let _ = writeln!(
        out,
        "{}[{}] (h:{}, s:{})",
        "  ".repeat(depth),
        node.chunk,
        node.height,
        node.size
    );
    dump(&node.left, depth + 1, out);
}

/// 通りがけ順にノードを列挙するイテレータ
pub(crate) struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    pub(crate) fn new(link: &'a Link) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(link);
        iter
    }

    fn push_left_spine(&mut self, mut link: &'a Link) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some(node)
    }
}
