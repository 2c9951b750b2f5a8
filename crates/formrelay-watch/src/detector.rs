//! Core detector implementation

use crate::config::DetectorConfig;
use crate::error::DetectError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// A candidate file the detector is tracking toward stability
///
/// Created when the detector first sees a path; forgotten once the path is
/// dispatched or vanishes from the directory.
#[derive(Debug, Clone)]
struct WatchedFile {
    /// Size at the last observation
    size: u64,

    /// When the last observation happened
    #[allow(dead_code)]
    observed_at: SystemTime,
}

/// Polling detector that dispatches a file once its size stops changing
///
/// The detector owns all scan state: the set of pending observations and the
/// seen-set of already-dispatched paths. Nothing else mutates either.
pub struct StableFileDetector {
    config: DetectorConfig,
    pending: HashMap<PathBuf, WatchedFile>,
    seen: HashSet<PathBuf>,
}

impl StableFileDetector {
    /// Create a detector for the configured directory
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
            seen: HashSet::new(),
        }
    }

    /// Perform one observation pass over the watched directory
    ///
    /// Returns the paths that became stable during this pass, in path order.
    /// Each returned path is moved to the seen-set and will never be
    /// dispatched again by this detector instance.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::Io` if the directory cannot be listed. The
    /// detector's state is left untouched in that case, so the next poll
    /// retries from the same position.
    pub fn scan(&mut self) -> Result<Vec<PathBuf>, DetectError> {
        let candidates = self.list_candidates()?;
        let current: HashSet<&PathBuf> = candidates.iter().collect();

        // Files deleted before stabilizing are silently dropped.
        self.pending.retain(|path, _| current.contains(path));

        let mut dispatched = Vec::new();

        for path in &candidates {
            if self.seen.contains(path) {
                continue;
            }

            // A file can vanish between listing and stat; treat as deleted.
            let size = match fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(_) => {
                    self.pending.remove(path);
                    continue;
                }
            };

            let previous_size = self.pending.get(path).map(|w| w.size);
            match previous_size {
                Some(prev) if prev == size && size > 0 => {
                    debug!(path = %path.display(), size, "file stable, dispatching");
                    self.pending.remove(path);
                    self.seen.insert(path.clone());
                    dispatched.push(path.clone());
                }
                Some(prev) if prev == size => {
                    // Zero-byte files never stabilize; logged at first sight.
                }
                Some(prev) => {
                    trace!(
                        path = %path.display(),
                        previous = prev,
                        current = size,
                        "size still changing"
                    );
                    self.observe(path.clone(), size);
                }
                None if size == 0 => {
                    debug!(path = %path.display(), "zero-byte file, holding until non-empty");
                    self.observe(path.clone(), size);
                }
                None => {
                    debug!(path = %path.display(), size, "new file observed");
                    self.observe(path.clone(), size);
                }
            }
        }

        Ok(dispatched)
    }

    /// Forget a dispatched path so a later copy of the same file is
    /// reprocessed (operator escape hatch)
    pub fn forget(&mut self, path: &Path) {
        self.seen.remove(path);
    }

    /// Number of paths dispatched so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of paths currently tracked toward stability
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn observe(&mut self, path: PathBuf, size: u64) {
        self.pending.insert(
            path,
            WatchedFile {
                size,
                observed_at: SystemTime::now(),
            },
        );
    }

    /// Recursively list files with an allowed extension, in path order
    fn list_candidates(&self) -> Result<Vec<PathBuf>, DetectError> {
        let mut found = Vec::new();
        let mut dirs = vec![self.config.watch_dir.clone()];

        while let Some(dir) = dirs.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_type = entry.file_type()?;

                if file_type.is_dir() {
                    dirs.push(path);
                } else if self.config.is_allowed(&path) {
                    found.push(path);
                }
            }
        }

        // read_dir order is platform-dependent; sort for a deterministic
        // dispatch order.
        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn detector_for(dir: &TempDir) -> StableFileDetector {
        StableFileDetector::new(DetectorConfig {
            watch_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
    }

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_dispatch_after_two_stable_observations() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "form.jpg", b"image bytes");
        let mut detector = detector_for(&dir);

        // First scan observes, second confirms stability.
        assert!(detector.scan().unwrap().is_empty());
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_dispatched_exactly_once() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "form.jpg", b"image bytes");
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap().len(), 1);
        assert!(detector.scan().unwrap().is_empty());
        assert!(detector.scan().unwrap().is_empty());
        assert_eq!(detector.seen_count(), 1);
    }

    #[test]
    fn test_growing_file_not_dispatched() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "form.jpg", b"partial");
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();

        // Simulate a slow network-drive sync appending bytes between polls.
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b" more bytes").unwrap();
        drop(file);

        assert!(detector.scan().unwrap().is_empty());

        // Size settled; next scan dispatches.
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_zero_byte_file_never_stabilizes() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "empty.jpg", b"");
        let mut detector = detector_for(&dir);

        for _ in 0..5 {
            assert!(detector.scan().unwrap().is_empty());
        }
        assert_eq!(detector.pending_count(), 1);
    }

    #[test]
    fn test_disallowed_extension_never_observed() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "notes.txt", b"not an image");
        let mut detector = detector_for(&dir);

        for _ in 0..3 {
            assert!(detector.scan().unwrap().is_empty());
        }
        assert_eq!(detector.pending_count(), 0);
    }

    #[test]
    fn test_deleted_file_silently_dropped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "form.jpg", b"image bytes");
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(detector.scan().unwrap().is_empty());
        assert_eq!(detector.pending_count(), 0);
        assert_eq!(detector.seen_count(), 0);
    }

    #[test]
    fn test_recursive_scan_finds_subdirectories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("batch1")).unwrap();
        let path = dir.path().join("batch1").join("form.png");
        File::create(&path).unwrap().write_all(b"png bytes").unwrap();
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_missing_directory_is_transient() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nonexistent");
        let mut detector = StableFileDetector::new(DetectorConfig {
            watch_dir: gone.clone(),
            ..Default::default()
        });

        assert!(matches!(detector.scan(), Err(DetectError::Io(_))));

        // Directory appears later; the detector recovers on the next poll.
        std::fs::create_dir(&gone).unwrap();
        let path = gone.join("form.jpg");
        File::create(&path).unwrap().write_all(b"image").unwrap();

        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_failed_scan_leaves_pending_intact() {
        let dir = TempDir::new().unwrap();
        let inbox = dir.path().join("inbox");
        std::fs::create_dir(&inbox).unwrap();
        let path = inbox.join("form.jpg");
        File::create(&path).unwrap().write_all(b"image bytes").unwrap();

        let mut detector = StableFileDetector::new(DetectorConfig {
            watch_dir: inbox.clone(),
            ..Default::default()
        });

        detector.scan().unwrap();
        assert_eq!(detector.pending_count(), 1);

        // The inbox vanishes mid-observation (network share unmounted).
        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&inbox).unwrap();

        assert!(matches!(detector.scan(), Err(DetectError::Io(_))));
        assert_eq!(detector.pending_count(), 1);

        // The share comes back with the same file at the same size; the
        // preserved observation lets the very next scan dispatch it.
        std::fs::create_dir(&inbox).unwrap();
        File::create(&path).unwrap().write_all(b"image bytes").unwrap();
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_forget_allows_redispatch() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "form.jpg", b"image bytes");
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap().len(), 1);

        detector.forget(&path);
        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_multiple_files_dispatched_in_path_order() {
        let dir = TempDir::new().unwrap();
        let b = write_file(&dir, "b.jpg", b"second");
        let a = write_file(&dir, "a.jpg", b"first");
        let mut detector = detector_for(&dir);

        detector.scan().unwrap();
        assert_eq!(detector.scan().unwrap(), vec![a, b]);
    }
}
