//! File change watcher for the user/group mapping file.
//!
//! The watcher is idle until [`FileWatcher::start`] subscribes it to a
//! [`Scheduler`]. On every tick it compares the file's modification time with
//! the last one it saw and, when the file is newer, parses it and hands the
//! entries to the update callback. A file that fails to parse is skipped as a
//! whole and the previously published data stays in effect.

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::scheduler::{Scheduler, SubscriptionId};
use crate::store::UpdateCallback;
use crate::{source, Error, Result};

/// Polls a mapping file and reloads it when it changes.
pub struct FileWatcher {
    path: PathBuf,
    callback: UpdateCallback,
    /// Last modification time seen; the lock also serializes checks.
    last_modified: Mutex<Option<SystemTime>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl FileWatcher {
    /// Create a watcher for `path`, which must already exist.
    pub fn new(path: impl Into<PathBuf>, callback: UpdateCallback) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(Error::MissingMonitoredFile(path));
        }

        Ok(Self {
            path,
            callback,
            last_modified: Mutex::new(None),
            subscription: Mutex::new(None),
        })
    }

    /// The monitored file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the watcher is subscribed to a scheduler.
    pub fn is_active(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Subscribe to `scheduler`'s ticks. Does nothing if already active.
    pub fn start(self: &Arc<Self>, scheduler: &Scheduler) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }

        log::info!("Starting file monitoring for file: {}", self.path.display());

        let watcher = Arc::clone(self);
        *subscription = Some(scheduler.subscribe(move || watcher.on_tick()));
    }

    /// Unsubscribe from `scheduler`. Does nothing if idle.
    pub fn stop(&self, scheduler: &Scheduler) {
        if let Some(id) = self.subscription.lock().take() {
            log::info!("Stopping file monitoring for file: {}", self.path.display());
            scheduler.unsubscribe(id);
        }
    }

    /// Reload the file if it was modified since the last check.
    ///
    /// Returns `Ok(true)` when a reload happened and was applied. The new
    /// modification time is recorded before reloading, so a file that fails
    /// to parse is retried only after it changes again.
    pub fn check_path(&self) -> Result<bool> {
        let mut last_modified = self.last_modified.lock();
        let modified = fs::metadata(&self.path)?.modified()?;

        if last_modified.map_or(false, |seen| modified <= seen) {
            log::debug!("Monitored file ({}) unchanged", self.path.display());
            return Ok(false);
        }

        *last_modified = Some(modified);
        self.reload()?;
        Ok(true)
    }

    /// Parse the file and publish its entries through the callback.
    ///
    /// Nothing is published unless every line parses. Returns the number of
    /// entries published.
    pub fn reload(&self) -> Result<usize> {
        log::info!(
            "Monitored file ({}) updated. Reloading data.",
            self.path.display()
        );

        let entries = source::parse_file(&self.path)?;
        let count = entries.len();
        (self.callback)(entries);
        Ok(count)
    }

    fn on_tick(&self) {
        if let Err(e) = self.check_path() {
            log::error!(
                "Error parsing monitored file ({}). Halting data reload: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entry, MembershipStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    fn write_mapping(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("mapping.csv");
        fs::write(&path, content).unwrap();
        path
    }

    /// Push the file's mtime forward so the change is visible regardless of
    /// filesystem timestamp granularity.
    fn touch_forward(path: &Path, secs: u64) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .unwrap();
    }

    fn counting_callback() -> (UpdateCallback, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: UpdateCallback = Arc::new(move |_entries: Vec<Entry>| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, calls)
    }

    #[test]
    fn test_missing_path_fails_fast() {
        let (callback, _) = counting_callback();
        let err = FileWatcher::new("/nonexistent/mapping.csv", callback).unwrap_err();
        assert!(matches!(err, Error::MissingMonitoredFile(_)));
        assert_eq!(
            err.to_string(),
            "Monitored file '/nonexistent/mapping.csv' must be an existing file."
        );
    }

    #[test]
    fn test_reload_publishes_entries() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "John,Male\nJane,Female\n");
        let store = Arc::new(MembershipStore::new());
        let watcher = FileWatcher::new(&path, store.updater()).unwrap();

        assert_eq!(watcher.reload().unwrap(), 2);
        assert!(store.lookup_user("John").unwrap().contains("Male"));
        assert!(store.lookup_group("Female").unwrap().contains("Jane"));
    }

    #[test]
    fn test_malformed_file_keeps_previous_generation() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "John,Male\n");
        let store = Arc::new(MembershipStore::new());
        let watcher = FileWatcher::new(&path, store.updater()).unwrap();
        watcher.reload().unwrap();
        let before = store.snapshot();

        fs::write(&path, "Jane,Female\nbroken line\nJane,Human\n").unwrap();
        assert!(matches!(
            watcher.reload(),
            Err(Error::MalformedEntry { line: 2, .. })
        ));

        assert_eq!(*store.snapshot(), *before);
        assert!(store.lookup_user("Jane").is_none());
    }

    #[test]
    fn test_malformed_file_fires_no_callback() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "a,b\na,b,c\n");
        let (callback, calls) = counting_callback();
        let watcher = FileWatcher::new(&path, callback).unwrap();

        assert!(watcher.check_path().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_check_path_reloads_only_on_change() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "John,Male\n");
        let (callback, calls) = counting_callback();
        let watcher = FileWatcher::new(&path, callback).unwrap();

        assert!(watcher.check_path().unwrap());
        assert!(!watcher.check_path().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        fs::write(&path, "John,Human\n").unwrap();
        touch_forward(&path, 10);
        assert!(watcher.check_path().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_reload_retries_after_next_change() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "John\n");
        let store = Arc::new(MembershipStore::new());
        let watcher = FileWatcher::new(&path, store.updater()).unwrap();

        assert!(watcher.check_path().is_err());
        assert!(!watcher.check_path().unwrap());
        assert_eq!(store.generation(), 0);

        fs::write(&path, "John,Male\n").unwrap();
        touch_forward(&path, 10);
        assert!(watcher.check_path().unwrap());
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_start_stop_with_scheduler() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "John,Male\n");
        let store = Arc::new(MembershipStore::new());
        let watcher = Arc::new(FileWatcher::new(&path, store.updater()).unwrap());
        let scheduler = Scheduler::new(Duration::from_millis(10));

        assert!(!watcher.is_active());
        watcher.start(&scheduler);
        watcher.start(&scheduler);
        assert!(watcher.is_active());
        assert_eq!(scheduler.subscriber_count(), 1);

        scheduler.tick();
        assert_eq!(store.generation(), 1);

        watcher.stop(&scheduler);
        assert!(!watcher.is_active());
        assert_eq!(scheduler.subscriber_count(), 0);

        fs::write(&path, "Jane,Female\n").unwrap();
        touch_forward(&path, 10);
        scheduler.tick();
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_tick_swallows_errors() {
        let dir = tempdir().unwrap();
        let path = write_mapping(&dir, "not,a,pair\n");
        let store = Arc::new(MembershipStore::new());
        let watcher = Arc::new(FileWatcher::new(&path, store.updater()).unwrap());
        let scheduler = Scheduler::new(Duration::from_millis(10));

        watcher.start(&scheduler);
        scheduler.tick();
        assert_eq!(store.generation(), 0);
        assert!(watcher.is_active());
    }
}
