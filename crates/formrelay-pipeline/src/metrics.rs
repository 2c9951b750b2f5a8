//! Run metrics for the worker loop

/// Counters accumulated across a worker run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerMetrics {
    /// Completed directory scans
    pub scan_count: u64,

    /// Scans that failed (directory inaccessible) and were retried
    pub scan_failures: u64,

    /// Files that made it all the way to a committed row
    pub files_processed: u64,

    /// Files whose pipeline aborted at some stage
    pub files_failed: u64,
}

impl WorkerMetrics {
    /// One-line summary for the shutdown log
    pub fn summary(&self) -> String {
        format!(
            "scans: {} ({} failed), files: {} processed, {} failed",
            self.scan_count, self.scan_failures, self.files_processed, self.files_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let metrics = WorkerMetrics {
            scan_count: 10,
            scan_failures: 1,
            files_processed: 4,
            files_failed: 2,
        };
        assert_eq!(
            metrics.summary(),
            "scans: 10 (1 failed), files: 4 processed, 2 failed"
        );
    }
}
