//! ファイルI/O操作
//!
//! UTF-8テキストファイルの読み込みと、チャンク列の逐次書き込み

use crate::error::{FileError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `~` とシェル変数を展開してパスを得る
///
/// 展開できない変数を含む場合は入力をそのまま使う
pub fn expand_path(path: &str) -> PathBuf {
    let tilde_expanded = if path == "~" || path.starts_with("~/") {
        match dirs::home_dir() {
            Some(home) => format!("{}{}", home.display(), &path[1..]),
            None => shellexpand::tilde(path).into_owned(),
        }
    } else {
        path.to_string()
    };

    if tilde_expanded.contains('$') {
        PathBuf::from(
            shellexpand::env(&tilde_expanded)
                .map(|expanded| expanded.into_owned())
                .unwrap_or(tilde_expanded),
        )
    } else {
        PathBuf::from(tilde_expanded)
    }
}

/// ファイルからテキストを読み込み
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path).map_err(|e| FileError::from_io(&e, path))?;
    log::debug!("read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// チャンク列を順番にファイルへ書き出す
///
/// ファイルは新規作成（既存内容は切り詰め）される
pub fn write_chunks<'a, P, I>(path: P, chunks: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a str>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FileError::from_io(&e, path))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0usize;
    for chunk in chunks {
        writer
            .write_all(chunk.as_bytes())
            .map_err(|e| FileError::from_io(&e, path))?;
        written += chunk.len();
    }
    writer.flush().map_err(|e| FileError::from_io(&e, path))?;

    log::debug!("wrote {} bytes to {}", written, path.display());
    Ok(())
}

/// テキストをファイルに書き込み
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    write_chunks(path, std::iter::once(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RopeError;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        let content = "Hello, World!\nこんにちは！";

        assert!(write_file(&file_path, content).is_ok());

        let read_content = read_file(&file_path).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_write_chunks_concatenates_in_order() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("chunks.txt");

        write_chunks(&file_path, ["Hello", ", ", "chunks"]).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Hello, chunks");
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let result = read_file(temp_dir.path().join("missing.txt"));
        assert!(matches!(
            result,
            Err(RopeError::File(FileError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_read_directory_is_invalid_path() {
        let temp_dir = tempdir().unwrap();
        let result = read_file(temp_dir.path());
        assert!(matches!(
            result,
            Err(RopeError::File(FileError::InvalidPath { .. }))
        ));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("no").join("such").join("dir.txt");
        assert!(write_file(&file_path, "x").unwrap_err().is_io());
    }

    #[test]
    fn test_expand_path_passthrough() {
        assert_eq!(expand_path("/tmp/plain.txt"), PathBuf::from("/tmp/plain.txt"));
        assert_eq!(expand_path("relative.txt"), PathBuf::from("relative.txt"));
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/notes.txt"), home.join("notes.txt"));
        }
    }
}
