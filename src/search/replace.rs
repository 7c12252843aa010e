//! リテラル・正規表現による置換
//!
//! マッチは元の文字列に対して求め、後ろから順にコピーへ差し込む。

use super::matcher::{kmp_search, lowercase_preserving_len};
use super::regex::{compile, replace_with_regex};
use super::types::BatchOperation;

/// `positions` を後ろから順に置換する。範囲は現在の長さで打ち切る
fn splice_from_end<F>(text: &str, positions: &[usize], match_len: usize, mut replacement: F) -> String
where
    F: FnMut(usize) -> String,
{
    let mut result: Vec<char> = text.chars().collect();
    for &pos in positions.iter().rev() {
        let start = pos.min(result.len());
        let end = (pos + match_len).min(result.len());
        let inserted = replacement(pos);
        result.splice(start..end, inserted.chars());
    }
    result.into_iter().collect()
}

/// すべての出現を置換
pub fn replace_all(text: &str, pattern: &str, replacement: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    let positions = kmp_search(text, pattern);
    splice_from_end(text, &positions, pattern.chars().count(), |_| {
        replacement.to_string()
    })
}

/// 最初の出現のみ置換
pub fn replace_first(text: &str, pattern: &str, replacement: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    match kmp_search(text, pattern).first() {
        Some(&pos) => splice_from_end(text, &[pos], pattern.chars().count(), |_| {
            replacement.to_string()
        }),
        None => text.to_string(),
    }
}

/// 各マッチをコールバックの戻り値で置換
///
/// コールバックには常に元の文字列から切り出したマッチが渡される
pub fn replace_with_callback<F>(text: &str, pattern: &str, mut callback: F) -> String
where
    F: FnMut(&str) -> String,
{
    let original: Vec<char> = text.chars().collect();
    let match_len = pattern.chars().count();
    let positions = kmp_search(text, pattern);

    splice_from_end(text, &positions, match_len, |pos| {
        let matched: String = original[pos..pos + match_len].iter().collect();
        callback(&matched)
    })
}

/// 操作を順番に適用する
///
/// 不正な正規表現の操作は読み飛ばす
pub fn batch_replace(text: &str, operations: &[BatchOperation]) -> String {
    operations.iter().fold(text.to_string(), |current, op| {
        if op.use_regex {
            match compile(&op.pattern, op.case_sensitive) {
                Ok(regex) => replace_with_regex(&regex, &current, &op.replacement),
                Err(err) => {
                    log::debug!("batch operation skipped: {}", err);
                    current
                }
            }
        } else if op.case_sensitive {
            replace_all(&current, &op.pattern, &op.replacement)
        } else {
            let positions = kmp_search(
                &lowercase_preserving_len(&current),
                &lowercase_preserving_len(&op.pattern),
            );
            splice_from_end(&current, &positions, op.pattern.chars().count(), |_| {
                op.replacement.clone()
            })
        }
    })
}
