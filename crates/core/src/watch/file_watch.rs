//! Watching a single file, typically `CMakeCache.txt`, for modification
//!
//! The file (and often its build directory) may not exist yet, so the
//! OS watch is placed on the nearest existing ancestor directory and moved
//! deeper as the missing directories appear. Every filesystem event in the
//! watched directory re-reads the file's modification time; `MtimeGate`
//! decides whether that is a change worth a refresh.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Fires when an existing file shows a modification time different from
/// the last one observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtimeGate {
    last: Option<SystemTime>,
}

impl MtimeGate {
    pub fn new(baseline: Option<SystemTime>) -> Self {
        Self { last: baseline }
    }

    /// `current` is `None` while the file does not exist
    pub fn observe(&mut self, current: Option<SystemTime>) -> bool {
        let changed = current.is_some() && current != self.last;
        self.last = current;
        changed
    }
}

enum WatchMsg {
    Fs(notify::Result<Event>),
    Stop,
}

/// Called on the watch thread each time the file's modification time changes
pub type ChangeCallback = Box<dyn Fn() + Send + 'static>;

/// A live watch on one file path. Dropping it stops the OS watch and the
/// forwarding thread.
pub struct FileWatch {
    path: PathBuf,
    control: Sender<WatchMsg>,
    thread: Option<JoinHandle<()>>,
}

impl FileWatch {
    pub fn new<F>(path: impl Into<PathBuf>, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let path = path.into();
        let target_dir = parent_dir(&path);
        let anchor = nearest_existing(&target_dir).ok_or_else(|| {
            Error::Other(format!("No existing directory above {}", path.display()))
        })?;

        let (tx, rx) = mpsc::channel();
        let events = tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = events.send(WatchMsg::Fs(res));
        })?;
        watcher.watch(&anchor, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching {:?} for {:?}", anchor, path);

        let gate = MtimeGate::new(modified(&path));
        let worker = Worker {
            watcher,
            anchor,
            target_dir,
            path: path.clone(),
            gate,
            on_change: Box::new(on_change),
        };
        let thread = thread::Builder::new()
            .name("cmake-file-watch".to_string())
            .spawn(move || worker.run(rx))?;

        Ok(Self {
            path,
            control: tx,
            thread: Some(thread),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileWatch {
    fn drop(&mut self) {
        let _ = self.control.send(WatchMsg::Stop);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("Stopped watching {:?}", self.path);
    }
}

impl std::fmt::Debug for FileWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatch").field("path", &self.path).finish()
    }
}

struct Worker {
    watcher: RecommendedWatcher,
    anchor: PathBuf,
    target_dir: PathBuf,
    path: PathBuf,
    gate: MtimeGate,
    on_change: ChangeCallback,
}

impl Worker {
    fn run(mut self, rx: Receiver<WatchMsg>) {
        while let Ok(msg) = rx.recv() {
            match msg {
                WatchMsg::Stop => break,
                WatchMsg::Fs(Err(e)) => tracing::warn!("File watch error: {}", e),
                WatchMsg::Fs(Ok(event)) => {
                    self.rearm(&event);
                    if self.gate.observe(modified(&self.path)) {
                        tracing::info!("{:?} changed", self.path);
                        (self.on_change)();
                    }
                }
            }
        }
    }

    /// Keep the OS watch on the nearest existing directory above the file.
    ///
    /// Moves deeper once a missing directory on the way has been created, and
    /// back up when the watched directory is removed. A directory removed and
    /// recreated before this runs is a new inode and is watched again.
    fn rearm(&mut self, event: &Event) {
        let lost = !self.anchor.is_dir()
            || (event.kind.is_remove() && event.paths.iter().any(|p| p == &self.anchor));
        if !lost && self.anchor == self.target_dir {
            return;
        }
        let Some(next) = nearest_existing(&self.target_dir) else {
            tracing::warn!("No existing directory above {:?}", self.path);
            return;
        };
        if !lost && next == self.anchor {
            return;
        }

        if lost {
            let _ = self.watcher.unwatch(&self.anchor);
        }
        if let Err(e) = self.watcher.watch(&next, RecursiveMode::NonRecursive) {
            tracing::warn!("Could not watch {:?}: {}", next, e);
            return;
        }
        if !lost {
            let _ = self.watcher.unwatch(&self.anchor);
        }
        tracing::debug!("Watch moved from {:?} to {:?}", self.anchor, next);
        self.anchor = next;
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn nearest_existing(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .find(|p| p.is_dir())
        .map(Path::to_path_buf)
}
