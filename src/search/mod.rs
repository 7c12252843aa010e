//! 検索・置換エンジン
//!
//! 状態を持たない関数群。入力は `&str`、位置と長さは文字単位

mod matcher;
mod regex;
mod replace;
mod stats;
pub mod types;

pub use matcher::{
    boyer_moore_search, case_insensitive_search, kmp_search, multi_pattern_search,
    rabin_karp_search, whole_word_search, Algorithm, BoyerMooreMatcher, KmpMatcher,
    RabinKarpMatcher, ShiftRule, StringMatcher,
};
pub use regex::{compile, regex_search, replace_regex};
pub use replace::{batch_replace, replace_all, replace_first, replace_with_callback};
pub use stats::{search_stats, search_with_context, DEFAULT_CONTEXT_LENGTH};
pub use types::{BatchOperation, ContextMatch, SearchStats};

pub(crate) use regex::match_positions;
