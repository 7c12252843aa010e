//! 正規表現検索と置換テンプレート
//!
//! 置換文字列は `$n`（キャプチャ）・`$&`（マッチ全体）・`` $` ``（マッチより前）・
//! `$'`（マッチより後）・`$$`（`$` そのもの）を解釈する。

use crate::error::{Result, RopeError};
use regex::{Captures, Regex, RegexBuilder};

#[derive(Debug, Clone)]
struct ReplacementTemplate {
    parts: Vec<TemplatePart>,
}

#[derive(Debug, Clone)]
enum TemplatePart {
    Literal(String),
    Group(usize),
    Prefix,
    Suffix,
}

impl ReplacementTemplate {
    fn parse(template: &str) -> Self {
        let mut chars = template.chars().peekable();
        let mut parts = Vec::new();
        let mut literal = String::new();

        while let Some(ch) = chars.next() {
            if ch != '$' {
                literal.push(ch);
                continue;
            }

            let special = match chars.peek().copied() {
                Some('$') => {
                    chars.next();
                    literal.push('$');
                    continue;
                }
                Some('&') => {
                    chars.next();
                    TemplatePart::Group(0)
                }
                Some('`') => {
                    chars.next();
                    TemplatePart::Prefix
                }
                Some('\'') => {
                    chars.next();
                    TemplatePart::Suffix
                }
                Some(digit) if digit.is_ascii_digit() => {
                    let mut index = 0usize;
                    while let Some(value) = chars.peek().and_then(|d| d.to_digit(10)) {
                        index = index.saturating_mul(10).saturating_add(value as usize);
                        chars.next();
                    }
                    TemplatePart::Group(index)
                }
                _ => {
                    literal.push('$');
                    continue;
                }
            };

            if !literal.is_empty() {
                parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
            }
            parts.push(special);
        }

        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }

        Self { parts }
    }

    fn render(&self, captures: &Captures<'_>, haystack: &str, output: &mut String) {
        let Some(whole) = captures.get(0) else {
            return;
        };
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => output.push_str(text),
                TemplatePart::Group(index) => {
                    if let Some(mat) = captures.get(*index) {
                        output.push_str(mat.as_str());
                    }
                }
                TemplatePart::Prefix => output.push_str(&haystack[..whole.start()]),
                TemplatePart::Suffix => output.push_str(&haystack[whole.end()..]),
            }
        }
    }
}

/// 正規表現をコンパイル
pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| RopeError::invalid_pattern(pattern, &err))
}

/// マッチ開始位置（文字単位）を列挙
pub(crate) fn match_positions(regex: &Regex, text: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut char_pos = 0usize;
    let mut byte_pos = 0usize;

    for mat in regex.find_iter(text) {
        char_pos += text[byte_pos..mat.start()].chars().count();
        byte_pos = mat.start();
        positions.push(char_pos);
    }

    positions
}

/// 正規表現による検索。不正なパターンはマッチなし
pub fn regex_search(text: &str, pattern: &str) -> Vec<usize> {
    match compile(pattern, true) {
        Ok(regex) => match_positions(&regex, text),
        Err(err) => {
            log::debug!("regex search skipped: {}", err);
            Vec::new()
        }
    }
}

/// コンパイル済みの正規表現ですべてのマッチを置換
pub(crate) fn replace_with_regex(regex: &Regex, text: &str, replacement: &str) -> String {
    let template = ReplacementTemplate::parse(replacement);
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0usize;

    for captures in regex.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        output.push_str(&text[last_end..whole.start()]);
        template.render(&captures, text, &mut output);
        last_end = whole.end();
    }
    output.push_str(&text[last_end..]);

    output
}

/// 正規表現による置換。不正なパターンは入力をそのまま返す
pub fn replace_regex(text: &str, pattern: &str, replacement: &str) -> String {
    match compile(pattern, true) {
        Ok(regex) => replace_with_regex(&regex, text, replacement),
        Err(err) => {
            log::debug!("regex replace skipped: {}", err);
            text.to_string()
        }
    }
}
