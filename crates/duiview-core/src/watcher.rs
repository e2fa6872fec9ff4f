//! Debounced watching of the previewed skin file
//!
//! Editors write in bursts while a file is being saved. Changes are held
//! behind a 250 ms quiet window and coalesced, so one burst produces one
//! event; the consumer re-reads the file, which makes the render use the
//! content of the last write in the burst.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

use crate::{Error, Result};

/// Quiet window applied to file events before a change is reported
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

/// Event emitted when a watched file changes
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A watched skin file changed on disk
    Modified(PathBuf),
    /// The underlying watcher reported an error
    Error(String),
}

/// Watches skin files for changes
pub struct SkinWatcher {
    /// The debouncer that handles file watching
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    /// Receiver for watch events
    receiver: Receiver<WatchEvent>,
    /// Paths being watched
    watched_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl SkinWatcher {
    /// Create a new skin watcher.
    ///
    /// `debounce_ms` overrides the default 250 ms quiet window.
    pub fn new(debounce_ms: Option<u64>) -> Result<Self> {
        let (tx, rx) = channel();
        let watched_paths = Arc::new(Mutex::new(Vec::new()));
        let watched_paths_clone = watched_paths.clone();

        let debounce_duration = debounce_ms.map_or(DEBOUNCE_WINDOW, Duration::from_millis);

        let debouncer = new_debouncer(
            debounce_duration,
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let path = event.path.clone();
                        let watched = watched_paths_clone.lock();

                        let is_watched =
                            watched.iter().any(|p| path.starts_with(p) || path == *p);
                        if !is_watched {
                            continue;
                        }

                        // Only skin XML, or the exact file that was asked for.
                        let is_xml = path.extension().is_some_and(|e| e == "xml");
                        let is_exact = watched.contains(&path);
                        if is_xml || is_exact {
                            // All debounced events are treated as modifications.
                            let _ = tx.send(WatchEvent::Modified(path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(format!("watch error: {e:?}")));
                }
            },
        )
        .map_err(|e| Error::Watch(format!("failed to create file watcher: {e:?}")))?;

        Ok(Self {
            _debouncer: debouncer,
            receiver: rx,
            watched_paths,
        })
    }

    /// Watch a skin file (or directory of skins) for changes.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());

        {
            let mut watched = self.watched_paths.lock();
            if !watched.contains(&canonical) {
                watched.push(canonical.clone());
            }
        }

        self._debouncer
            .watcher()
            .watch(&canonical, RecursiveMode::NonRecursive)
            .map_err(|e| {
                Error::Watch(format!("failed to watch {}: {e}", canonical.display()))
            })?;

        tracing::info!("watching: {}", canonical.display());
        Ok(())
    }

    /// Stop watching a path.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        {
            let mut watched = self.watched_paths.lock();
            watched.retain(|p| p != &canonical);
        }

        self._debouncer
            .watcher()
            .unwatch(&canonical)
            .map_err(|e| {
                Error::Watch(format!("failed to unwatch {}: {e}", canonical.display()))
            })?;

        Ok(())
    }

    /// Try to receive a watch event (non-blocking).
    pub fn try_recv(&self) -> Option<WatchEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receive a watch event (blocking).
    pub fn recv(&self) -> Option<WatchEvent> {
        self.receiver.recv().ok()
    }

    /// Receive a watch event with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WatchEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Get all pending events.
    pub fn drain_events(&self) -> Vec<WatchEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn watcher_creation() {
        let watcher = SkinWatcher::new(None);
        assert!(watcher.is_ok());
    }

    #[test]
    fn watcher_creation_with_custom_debounce() {
        let watcher = SkinWatcher::new(Some(50));
        assert!(watcher.is_ok());
    }

    #[test]
    fn watching_a_nonexistent_file_fails() {
        let mut watcher = SkinWatcher::new(None).unwrap();
        let result = watcher.watch("/nonexistent/path/window.xml");
        assert!(result.is_err());
    }

    #[test]
    fn no_events_without_changes() {
        let watcher = SkinWatcher::new(None).unwrap();
        assert!(watcher.try_recv().is_none());
        assert!(watcher.drain_events().is_empty());
    }

    #[test]
    fn burst_of_writes_coalesces_into_one_event() {
        use std::fs;
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("window.xml");
        fs::write(&file, "<Window/>").unwrap();

        let mut watcher = SkinWatcher::new(None).unwrap();
        watcher.watch(&file).unwrap();

        for content in ["<Window a=\"1\"/>", "<Window a=\"2\"/>", "<Window a=\"3\"/>"] {
            fs::write(&file, content).unwrap();
            thread::sleep(Duration::from_millis(30));
        }

        // One coalesced event once the quiet window passes...
        let event = watcher.recv_timeout(Duration::from_secs(3));
        assert!(matches!(event, Some(WatchEvent::Modified(_))));
        // ...and nothing further from the same burst.
        assert!(watcher.recv_timeout(Duration::from_millis(400)).is_none());
    }
}
