//! 文字列マッチングアルゴリズム
//!
//! KMP・Boyer–Moore・Rabin–Karp と、それらを組み合わせた
//! 大文字小文字無視検索・単語単位検索・複数パターン検索。
//! 返す位置はすべて文字（`char`）単位。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// 文字列中のすべての出現開始位置を返す
    fn find_positions(&self, text: &[char], pattern: &[char]) -> Vec<usize>;

    /// `&str` 版。空パターンや本文より長いパターンはマッチなし
    fn find_all(&self, text: &str, pattern: &str) -> Vec<usize> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }
        self.find_positions(&text, &pattern)
    }
}

/// Knuth–Morris–Pratt（重なりを含むすべてのマッチ）
#[derive(Debug, Default, Clone, Copy)]
pub struct KmpMatcher;

impl KmpMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for KmpMatcher {
    fn find_positions(&self, text: &[char], pattern: &[char]) -> Vec<usize> {
        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }

        let lps = longest_prefix_suffix(pattern);
        let mut result = Vec::new();
        let mut matched = 0usize;

        for (i, &ch) in text.iter().enumerate() {
            while matched > 0 && pattern[matched] != ch {
                matched = lps[matched - 1];
            }
            if pattern[matched] == ch {
                matched += 1;
            }
            if matched == pattern.len() {
                result.push(i + 1 - matched);
                matched = lps[matched - 1];
            }
        }

        result
    }
}

/// 各接頭辞について、真の接頭辞かつ接尾辞である最長の長さ
fn longest_prefix_suffix(pattern: &[char]) -> Vec<usize> {
    let mut lps = vec![0usize; pattern.len()];
    let mut len = 0usize;

    for i in 1..pattern.len() {
        while len > 0 && pattern[i] != pattern[len] {
            len = lps[len - 1];
        }
        if pattern[i] == pattern[len] {
            len += 1;
        }
        lps[i] = len;
    }

    lps
}

/// Boyer–Moore のずらし規則
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShiftRule {
    /// 良い接尾辞表を常にパターン長とする簡略版。
    /// 不一致時は常にパターン長以上ずらすため、マッチを取りこぼすことがある
    #[default]
    Placeholder,
    /// 境界配列から求める強い良い接尾辞規則と最終出現位置による悪い文字規則
    GoodSuffix,
}

/// Boyer–Moore（末尾から比較）
#[derive(Debug, Default, Clone, Copy)]
pub struct BoyerMooreMatcher {
    rule: ShiftRule,
}

impl BoyerMooreMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(rule: ShiftRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ShiftRule {
        self.rule
    }
}

impl StringMatcher for BoyerMooreMatcher {
    fn find_positions(&self, text: &[char], pattern: &[char]) -> Vec<usize> {
        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }
        match self.rule {
            ShiftRule::Placeholder => placeholder_boyer_moore(text, pattern),
            ShiftRule::GoodSuffix => good_suffix_boyer_moore(text, pattern),
        }
    }
}

/// 末尾文字を除く各文字について、末尾からの距離（最後の出現で上書き）
fn distance_from_end_table(pattern: &[char]) -> HashMap<char, usize> {
    let m = pattern.len();
    let mut table = HashMap::new();
    for (i, &ch) in pattern[..m - 1].iter().enumerate() {
        table.insert(ch, m - 1 - i);
    }
    table
}

fn placeholder_boyer_moore(text: &[char], pattern: &[char]) -> Vec<usize> {
    let n = text.len();
    let m = pattern.len();
    let bad_char = distance_from_end_table(pattern);
    let good_suffix = vec![m; m];
    let bad = |ch: char| bad_char.get(&ch).copied().unwrap_or(0);

    let mut result = Vec::new();
    let mut shift = 0usize;

    while shift + m <= n {
        let mismatch = (0..m).rev().find(|&j| pattern[j] != text[shift + j]);
        match mismatch {
            None => {
                result.push(shift);
                shift += if shift + m < n {
                    m - bad(text[shift + m])
                } else {
                    1
                };
            }
            Some(j) => {
                let bad_shift = j as isize - bad(text[shift + j]) as isize;
                shift += (good_suffix[j] as isize).max(bad_shift) as usize;
            }
        }
    }

    result
}

/// 強い良い接尾辞規則のずらし表（長さ m+1、添字は一致済み区間の開始位置）
fn good_suffix_shifts(pattern: &[char]) -> Vec<usize> {
    let m = pattern.len();
    let mut shift = vec![0usize; m + 1];
    let mut border = vec![0usize; m + 1];

    let mut i = m;
    let mut j = m + 1;
    border[i] = j;
    while i > 0 {
        while j <= m && pattern[i - 1] != pattern[j - 1] {
            if shift[j] == 0 {
                shift[j] = j - i;
            }
            j = border[j];
        }
        i -= 1;
        j -= 1;
        border[i] = j;
    }

    let mut j = border[0];
    for (i, slot) in shift.iter_mut().enumerate() {
        if *slot == 0 {
            *slot = j;
        }
        if i == j {
            j = border[j];
        }
    }

    shift
}

fn good_suffix_boyer_moore(text: &[char], pattern: &[char]) -> Vec<usize> {
    let n = text.len();
    let m = pattern.len();
    let good_suffix = good_suffix_shifts(pattern);
    let mut last_occurrence = HashMap::new();
    for (i, &ch) in pattern.iter().enumerate() {
        last_occurrence.insert(ch, i as isize);
    }

    let mut result = Vec::new();
    let mut shift = 0usize;

    while shift + m <= n {
        match (0..m).rev().find(|&j| pattern[j] != text[shift + j]) {
            None => {
                result.push(shift);
                shift += good_suffix[0];
            }
            Some(j) => {
                let last = last_occurrence.get(&text[shift + j]).copied().unwrap_or(-1);
                let bad_shift = j as isize - last;
                shift += (good_suffix[j + 1] as isize).max(bad_shift) as usize;
            }
        }
    }

    result
}

const RABIN_KARP_BASE: u64 = 256;
const RABIN_KARP_MODULUS: u64 = 1_000_000_007;

/// Rabin–Karp（ローリングハッシュ、ハッシュ一致は必ず照合する）
#[derive(Debug, Default, Clone, Copy)]
pub struct RabinKarpMatcher;

impl RabinKarpMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for RabinKarpMatcher {
    fn find_positions(&self, text: &[char], pattern: &[char]) -> Vec<usize> {
        let n = text.len();
        let m = pattern.len();
        if m == 0 || m > n {
            return Vec::new();
        }

        let pattern_hash = window_hash(pattern);
        let mut hash = window_hash(&text[..m]);
        let high = mod_pow(RABIN_KARP_BASE, (m - 1) as u64);
        let mut result = Vec::new();

        for i in 0..=n - m {
            if hash == pattern_hash && text[i..i + m] == *pattern {
                result.push(i);
            }
            if i + m < n {
                let outgoing = (char_value(text[i]) * high) % RABIN_KARP_MODULUS;
                hash = (hash + RABIN_KARP_MODULUS - outgoing) % RABIN_KARP_MODULUS;
                hash = (hash * RABIN_KARP_BASE + char_value(text[i + m])) % RABIN_KARP_MODULUS;
            }
        }

        result
    }
}

fn char_value(ch: char) -> u64 {
    u64::from(ch) % RABIN_KARP_MODULUS
}

fn window_hash(window: &[char]) -> u64 {
    window.iter().fold(0, |hash, &ch| {
        (hash * RABIN_KARP_BASE + char_value(ch)) % RABIN_KARP_MODULUS
    })
}

fn mod_pow(mut base: u64, mut exp: u64) -> u64 {
    let mut result = 1u64;
    base %= RABIN_KARP_MODULUS;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result * base) % RABIN_KARP_MODULUS;
        }
        exp >>= 1;
        base = (base * base) % RABIN_KARP_MODULUS;
    }
    result
}

/// 名前で選べるリテラル検索アルゴリズム
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Kmp,
    BoyerMoore,
    RabinKarp,
}

impl Algorithm {
    pub fn matcher(self) -> Box<dyn StringMatcher> {
        match self {
            Algorithm::Kmp => Box::new(KmpMatcher::new()),
            Algorithm::BoyerMoore => Box::new(BoyerMooreMatcher::new()),
            Algorithm::RabinKarp => Box::new(RabinKarpMatcher::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Kmp => "kmp",
            Algorithm::BoyerMoore => "boyer-moore",
            Algorithm::RabinKarp => "rabin-karp",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kmp" => Ok(Algorithm::Kmp),
            "bm" | "boyer-moore" | "boyer_moore" => Ok(Algorithm::BoyerMoore),
            "rk" | "rabin-karp" | "rabin_karp" => Ok(Algorithm::RabinKarp),
            other => Err(format!("unknown algorithm: {}", other)),
        }
    }
}

/// KMP による全出現位置（重なりを含む）
pub fn kmp_search(text: &str, pattern: &str) -> Vec<usize> {
    KmpMatcher.find_all(text, pattern)
}

/// 簡略版良い接尾辞表による Boyer–Moore
///
/// 不一致時のずらし幅が常にパターン長以上になるため、
/// KMP が見つけるマッチの一部しか返さないことがある
pub fn boyer_moore_search(text: &str, pattern: &str) -> Vec<usize> {
    BoyerMooreMatcher::new().find_all(text, pattern)
}

/// Rabin–Karp による全出現位置
pub fn rabin_karp_search(text: &str, pattern: &str) -> Vec<usize> {
    RabinKarpMatcher.find_all(text, pattern)
}

/// 1文字に収まる場合のみ小文字化（文字数を保つ）
pub(crate) fn lower_char(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// 文字数を変えない小文字化
pub(crate) fn lowercase_preserving_len(text: &str) -> String {
    text.chars().map(lower_char).collect()
}

/// 大文字小文字を区別しない検索。位置は元の文字列を指す
pub fn case_insensitive_search(text: &str, pattern: &str) -> Vec<usize> {
    kmp_search(
        &lowercase_preserving_len(text),
        &lowercase_preserving_len(pattern),
    )
}

/// 両端が単語境界にあるマッチのみを返す
pub fn whole_word_search(text: &str, pattern: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let pattern_len = pattern.chars().count();

    kmp_search(text, pattern)
        .into_iter()
        .filter(|&pos| is_word_boundary(&chars, pos) && is_word_boundary(&chars, pos + pattern_len))
        .collect()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// 文書の端、または前後どちらかが非単語文字なら境界
fn is_word_boundary(chars: &[char], position: usize) -> bool {
    if position == 0 || position >= chars.len() {
        return true;
    }
    !is_word_char(chars[position - 1]) || !is_word_char(chars[position])
}

/// 複数パターンの出現を `(位置, パターン)` の昇順で返す
pub fn multi_pattern_search(text: &str, patterns: &[&str]) -> Vec<(usize, String)> {
    let mut result: Vec<(usize, String)> = patterns
        .iter()
        .flat_map(|pattern| {
            kmp_search(text, pattern)
                .into_iter()
                .map(move |pos| (pos, pattern.to_string()))
        })
        .collect();
    result.sort();
    result
}
