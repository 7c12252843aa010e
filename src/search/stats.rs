//! 文脈付き検索と検索統計

use super::matcher::kmp_search;
use super::types::{ContextMatch, SearchStats};
use std::collections::HashSet;

/// 文脈の既定幅（片側の文字数）
pub const DEFAULT_CONTEXT_LENGTH: usize = 50;

const ELLIPSIS: &str = "...";

/// 各マッチを前後 `context_length` 文字の文脈付きで返す
pub fn search_with_context(text: &str, pattern: &str, context_length: usize) -> Vec<ContextMatch> {
    let chars: Vec<char> = text.chars().collect();
    let length = pattern.chars().count();

    kmp_search(text, pattern)
        .into_iter()
        .map(|position| ContextMatch {
            position,
            length,
            matched_text: chars[position..position + length].iter().collect(),
            context: extract_context(&chars, position, length, context_length),
        })
        .collect()
}

fn extract_context(chars: &[char], position: usize, length: usize, context_length: usize) -> String {
    let start = position.saturating_sub(context_length);
    let end = position
        .saturating_add(length)
        .saturating_add(context_length)
        .min(chars.len());

    let mut context = String::new();
    if start > 0 {
        context.push_str(ELLIPSIS);
    }
    context.extend(&chars[start..end]);
    if end < chars.len() {
        context.push_str(ELLIPSIS);
    }
    context
}

/// 複数パターンの出現数・異なるマッチ数・平均長を集計
pub fn search_stats(text: &str, patterns: &[&str]) -> SearchStats {
    let mut stats = SearchStats::default();
    let mut unique = HashSet::new();
    let mut total_length = 0usize;

    for pattern in patterns {
        let positions = kmp_search(text, pattern);
        let pattern_len = pattern.chars().count();

        stats.total_matches += positions.len();
        stats.pattern_counts.insert(pattern.to_string(), positions.len());
        if !positions.is_empty() {
            unique.insert(*pattern);
        }
        total_length += pattern_len * positions.len();
    }

    stats.unique_matches = unique.len();
    if stats.total_matches > 0 {
        stats.average_match_length = total_length as f64 / stats.total_matches as f64;
    }
    stats
}
