//! Long-running watch loop driving the pipeline

use crate::metrics::WorkerMetrics;
use crate::pipeline::Pipeline;
use formrelay_domain::{ArtifactStore, ExtractionModel, RecordStore};
use formrelay_watch::{DetectorConfig, StableFileDetector};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// Background worker that scans the watched directory on a schedule and runs
/// the pipeline for each file that stabilizes
///
/// Single-task, cooperative: the scan-and-wait cycle and the per-file
/// pipeline execute serially, so there is at most one in-flight extraction
/// at any time. Shutdown is checked between iterations, never mid-pipeline.
pub struct PipelineWorker<A, M, R>
where
    A: ArtifactStore,
    M: ExtractionModel,
    R: RecordStore,
{
    detector: StableFileDetector,
    pipeline: Pipeline<A, M, R>,
    poll_interval: Duration,
    metrics: WorkerMetrics,
}

impl<A, M, R> PipelineWorker<A, M, R>
where
    A: ArtifactStore,
    M: ExtractionModel,
    R: RecordStore,
    A::Error: std::fmt::Display,
    M::Error: std::fmt::Display,
    R::Error: std::fmt::Display,
{
    /// Create a worker watching the configured directory
    pub fn new(config: DetectorConfig, pipeline: Pipeline<A, M, R>) -> Self {
        let poll_interval = config.poll_interval();
        Self {
            detector: StableFileDetector::new(config),
            pipeline,
            poll_interval,
            metrics: WorkerMetrics::default(),
        }
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    pub async fn run(&mut self) {
        let mut ticker = interval(self.poll_interval);

        info!(interval = ?self.poll_interval, "watch loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, stopping watcher");
                    break;
                }
            }
        }

        info!("watcher stopped. {}", self.metrics.summary());
    }

    /// Run for a specific number of polling cycles (useful for testing)
    pub async fn run_cycles(&mut self, cycles: usize) {
        let mut ticker = interval(self.poll_interval);

        for _ in 0..cycles {
            ticker.tick().await;
            self.tick().await;
        }

        debug!("finished {} cycles. {}", cycles, self.metrics.summary());
    }

    /// One scan-and-process iteration
    async fn tick(&mut self) {
        self.metrics.scan_count += 1;

        let ready = match self.detector.scan() {
            Ok(ready) => ready,
            Err(e) => {
                // Transient by contract: retried on the next poll.
                warn!("directory scan failed: {}", e);
                self.metrics.scan_failures += 1;
                return;
            }
        };

        // Strictly in detection order, one file at a time. A failure aborts
        // that file only; the loop itself never terminates.
        for path in ready {
            match self.pipeline.process_file(&path).await {
                Ok(record_id) => {
                    self.metrics.files_processed += 1;
                    info!(path = %path.display(), record_id = %record_id, "file processed");
                }
                Err(e) => {
                    self.metrics.files_failed += 1;
                    error!(
                        path = %path.display(),
                        stage = e.stage(),
                        "skipping file: {}",
                        e
                    );
                }
            }
        }
    }

    /// Counters accumulated so far
    pub fn metrics(&self) -> &WorkerMetrics {
        &self.metrics
    }

    /// The pipeline, for post-run inspection
    pub fn pipeline(&self) -> &Pipeline<A, M, R> {
        &self.pipeline
    }
}
