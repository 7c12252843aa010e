//! 自動保存
//!
//! 共有バッファの版番号を見て、変更があった場合のみ `<path>.autosave` へ書き出す。
//! `AutoSaveTask::tick` を呼び出し側のループから使うことも、
//! `AutoSaver` で専用スレッドに任せることもできる。

use crate::buffer::SharedBuffer;
use crate::error::RopeError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 保存間隔の下限。これより短い指定は切り上げる
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// 1回の tick の結果
#[derive(Debug)]
pub enum AutoSaveOutcome {
    /// 間隔がまだ経過していない
    NotDue,
    /// 前回の保存から変更がない
    Unchanged,
    /// 保存した
    Saved,
    /// 保存に失敗した（次回再試行する）
    Failed(RopeError),
}

/// 自動保存の先を決める
pub fn autosave_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".autosave");
    PathBuf::from(name)
}

/// 協調的に呼び出す自動保存タスク
#[derive(Debug)]
pub struct AutoSaveTask {
    buffer: SharedBuffer,
    target: PathBuf,
    interval: Duration,
    last_run: Instant,
    saved_revision: u64,
}

impl AutoSaveTask {
    /// `path` の編集内容を `interval` ごとに `<path>.autosave` へ保存する
    ///
    /// `interval` は `MIN_INTERVAL` 未満なら切り上げる
    pub fn new(buffer: SharedBuffer, path: impl AsRef<Path>, interval: Duration) -> Self {
        let saved_revision = buffer.read().revision();
        if interval < MIN_INTERVAL {
            log::debug!("auto-save interval {:?} raised to {:?}", interval, MIN_INTERVAL);
        }
        Self {
            buffer,
            target: autosave_path(path.as_ref()),
            interval: interval.max(MIN_INTERVAL),
            last_run: Instant::now(),
            saved_revision,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 現在時刻で判定
    pub fn tick(&mut self) -> AutoSaveOutcome {
        self.tick_at(Instant::now())
    }

    /// 指定時刻で判定（間隔が経過していれば保存を試みる）
    pub fn tick_at(&mut self, now: Instant) -> AutoSaveOutcome {
        if now.saturating_duration_since(self.last_run) < self.interval {
            return AutoSaveOutcome::NotDue;
        }
        self.last_run = now;
        self.save_if_changed()
    }

    /// 間隔に関係なく、変更があれば保存する
    pub fn save_if_changed(&mut self) -> AutoSaveOutcome {
        // 書き出しはロックの外で行う
        let snapshot = self.buffer.snapshot();
        let revision = snapshot.revision();
        if revision == self.saved_revision {
            return AutoSaveOutcome::Unchanged;
        }

        match snapshot.save_to_file(&self.target) {
            Ok(()) => {
                self.saved_revision = revision;
                log::info!("auto-saved revision {} to {}", revision, self.target.display());
                AutoSaveOutcome::Saved
            }
            Err(err) => {
                log::warn!("auto-save to {} failed: {}", self.target.display(), err);
                AutoSaveOutcome::Failed(err)
            }
        }
    }
}

/// 自動保存スレッドのハンドル。`stop` または破棄で停止する
#[derive(Debug)]
pub struct AutoSaver {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoSaver {
    /// `task` の間隔ごとに保存するスレッドを起動
    pub fn spawn(mut task: AutoSaveTask) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = task.interval();

        let handle = thread::spawn(move || {
            log::debug!("auto-save thread started for {}", task.target().display());
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        task.save_if_changed();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::debug!("auto-save thread stopped for {}", task.target().display());
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// スレッドを停止して終了を待つ
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("auto-save thread panicked");
            }
        }
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
