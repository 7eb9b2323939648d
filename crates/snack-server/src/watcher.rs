//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// JSON content file was modified
    ContentModified(PathBuf),

    /// HTML template was modified
    TemplateModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification
    Modified(PathBuf),
}

impl WatchEvent {
    /// Path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::ContentModified(p)
            | WatchEvent::TemplateModified(p)
            | WatchEvent::Created(p)
            | WatchEvent::Deleted(p)
            | WatchEvent::Modified(p) => p,
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Paths that do not exist are skipped. Returns the watcher and a channel
    /// to receive events; dropping the watcher stops the events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::debug!("Not watching missing path {}", path.display());
            }
        }

        std::thread::spawn(move || {
            // Editors emit bursts per save (swap file, rename, chmod); wait
            // for the burst to go quiet before reporting it.
            let quiet_period = Duration::from_millis(100);

            while let Ok(first) = sync_rx.recv() {
                let mut burst = vec![first];
                while let Ok(event) = sync_rx.recv_timeout(quiet_period) {
                    burst.push(event);
                }

                for e in coalesce(burst) {
                    if async_tx.blocking_send(e).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Collapse a burst of notify events into one event per path.
///
/// Paths keep the order they first appeared in; each reports its last change.
fn coalesce(burst: Vec<notify::Event>) -> Vec<WatchEvent> {
    let mut events: Vec<WatchEvent> = Vec::new();

    for event in burst {
        for path in &event.paths {
            let Some(classified) = classify_event(path, &event.kind) else {
                continue;
            };
            match events.iter_mut().find(|e| e.path() == path.as_path()) {
                Some(existing) => *existing = classified,
                None => events.push(classified),
            }
        }
    }

    events
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => match ext {
            "json" => Some(WatchEvent::ContentModified(path.to_path_buf())),
            "html" => Some(WatchEvent::TemplateModified(path.to_path_buf())),
            _ => Some(WatchEvent::Modified(path.to_path_buf())),
        },
        _ => None,
    }
}
