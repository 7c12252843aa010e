//! エラーハンドリングシステム
//!
//! バッファ・検索エンジン全体で使用される統一されたエラー型を定義
//! ファイルI/Oエラーのみ呼び出し元へ伝播し、正規表現・範囲外アクセスは既定値へ劣化させる

use std::io;
use std::path::Path;
use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum RopeError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 不正な正規表現パターン
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl FileError {
    /// `std::io::Error` をパス情報付きで分類する
    pub fn from_io(error: &io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FileError::Encoding {
                message: format!("{}: {}", path, error),
            },
            _ => FileError::Io {
                message: format!("{}: {}", path, error),
            },
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl RopeError {
    /// 正規表現のコンパイルエラーから生成
    pub fn invalid_pattern(pattern: &str, error: &regex::Error) -> Self {
        RopeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: error.to_string(),
        }
    }

    /// ファイルI/O由来のエラーか判定
    pub fn is_io(&self) -> bool {
        matches!(self, RopeError::File(_))
    }
}

// std::io::Error から RopeError への変換（パス不明時）
impl From<io::Error> for RopeError {
    fn from(error: io::Error) -> Self {
        RopeError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, RopeError>;
