//! バッファ内検索
//!
//! チャンクごとに独立して照合する。チャンク境界をまたぐ出現は報告されない

use super::TextBuffer;
use crate::config::PatternErrorPolicy;
use crate::error::Result;
use crate::search::{self, match_positions};

impl TextBuffer {
    /// リテラル検索（各チャンク内で重ならない出現）
    pub fn find_all(&self, pattern: &str) -> Vec<usize> {
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut positions = Vec::new();
        let mut offset = 0usize;
        for chunk in self.chunks() {
            let mut char_pos = 0usize;
            let mut byte_pos = 0usize;
            for (start, _) in chunk.match_indices(pattern) {
                char_pos += chunk[byte_pos..start].chars().count();
                byte_pos = start;
                positions.push(offset + char_pos);
            }
            offset += chunk.chars().count();
        }
        positions
    }

    /// 正規表現検索。不正なパターンはマッチなしとして扱う
    pub fn find_all_regex(&self, pattern: &str) -> Vec<usize> {
        self.find_all_regex_with(pattern, PatternErrorPolicy::Skip)
            .unwrap_or_default()
    }

    /// 不正なパターンの扱いを指定して正規表現検索
    pub fn find_all_regex_with(
        &self,
        pattern: &str,
        policy: PatternErrorPolicy,
    ) -> Result<Vec<usize>> {
        let regex = match search::compile(pattern, true) {
            Ok(regex) => regex,
            Err(err) => {
                return match policy {
                    PatternErrorPolicy::Skip => {
                        log::debug!("buffer regex search skipped: {}", err);
                        Ok(Vec::new())
                    }
                    PatternErrorPolicy::Fail => Err(err),
                };
            }
        };

        let mut positions = Vec::new();
        let mut offset = 0usize;
        for chunk in self.chunks() {
            positions.extend(match_positions(&regex, chunk).into_iter().map(|pos| offset + pos));
            offset += chunk.chars().count();
        }
        Ok(positions)
    }
}
