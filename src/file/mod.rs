//! ファイル管理モジュール
//!
//! フラットな UTF-8 テキストの読み書きとパス展開を提供

pub mod io;

pub use io::{expand_path, read_file, write_chunks, write_file};
