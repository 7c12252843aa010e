//! エンジン設定
//!
//! 履歴上限・自動保存間隔・検索コンテキスト幅などを JSON から読み込む

use crate::error::{ConfigError, FileError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 正規表現コンパイル失敗時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternErrorPolicy {
    /// マッチなしとして扱う
    #[default]
    Skip,
    /// エラーとして呼び出し元へ返す
    Fail,
}

/// バッファ・検索エンジンの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// undo スタックの最大保持数
    pub history_limit: usize,
    /// 上限超過時に残す件数（新しいものから）
    pub history_trim_to: usize,
    /// 自動保存の間隔（秒）
    pub autosave_interval_secs: u64,
    /// `search_with_context` の既定コンテキスト幅（文字数）
    pub context_length: usize,
    /// バッファ内正規表現検索の失敗時ポリシー
    pub pattern_error_policy: PatternErrorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            history_trim_to: 25,
            autosave_interval_secs: 30,
            context_length: 50,
            pattern_error_policy: PatternErrorPolicy::Skip,
        }
    }
}

impl EngineConfig {
    /// JSON ファイルから読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| FileError::from_io(&e, path))?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|_| ConfigError::InvalidFile {
                path: path.display().to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 既定パスから読み込み、存在しなければ既定値を返す
    pub fn load_or_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// JSON 文字列へ変換
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// 値の整合性を検証
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(invalid("history_limit", self.history_limit).into());
        }
        if self.history_trim_to > self.history_limit {
            return Err(invalid("history_trim_to", self.history_trim_to).into());
        }
        if self.autosave_interval_secs == 0 {
            return Err(invalid("autosave_interval_secs", self.autosave_interval_secs).into());
        }
        Ok(())
    }

    /// 自動保存間隔
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// 既定の設定ファイルパス（`~/.altre-rope/config.json`）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".altre-rope").join("config.json"))
}
