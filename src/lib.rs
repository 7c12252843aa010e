//! altre-rope - AVL rope text buffer and pattern matching engine
//!
//! 位置インデックス付きの平衡木テキストバッファと、文字列検索・置換エンジン

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// ロジック層
pub mod search;

// バックグラウンド処理
pub mod autosave;

// 公開API
pub use autosave::{AutoSaveOutcome, AutoSaveTask, AutoSaver};
pub use buffer::{SharedBuffer, TextBuffer};
pub use config::{EngineConfig, PatternErrorPolicy};
pub use error::{ConfigError, FileError, Result, RopeError};
