//! 検索関連の共通型

use serde::Serialize;
use std::collections::BTreeMap;

/// 前後の文脈付きマッチ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextMatch {
    /// マッチ開始位置（文字インデックス）
    pub position: usize,
    /// マッチ長（文字数）
    pub length: usize,
    /// マッチした文字列
    pub matched_text: String,
    /// 前後の文脈。文書端で切れていない側には `...` が付く
    pub context: String,
}

/// 一括置換の1操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperation {
    pub pattern: String,
    pub replacement: String,
    pub use_regex: bool,
    pub case_sensitive: bool,
}

impl BatchOperation {
    /// 大文字小文字を区別するリテラル置換
    pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            use_regex: false,
            case_sensitive: true,
        }
    }

    /// 正規表現置換
    pub fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            use_regex: true,
            ..Self::literal(pattern, replacement)
        }
    }

    /// 大文字小文字を区別しない
    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

/// 複数パターンの検索統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// 全パターンの総マッチ数
    pub total_matches: usize,
    /// 異なるマッチ文字列の数
    pub unique_matches: usize,
    /// パターンごとのマッチ数
    pub pattern_counts: BTreeMap<String, usize>,
    /// マッチ文字列の平均長（マッチなしなら0）
    pub average_match_length: f64,
}
