//! Batch framing of a whole folder.
//!
//! Takes a [`BatchJob`] (input folder, output folder, parsed frame settings)
//! and frames every eligible image in parallel on a dedicated rayon pool.
//!
//! ## Flow
//!
//! ```text
//! create output dir → scan input (flat) → Started → frame files in parallel
//!                                                    └─ FileFinished × N
//! ```
//!
//! ## Pool size
//!
//! `min(8, available cores, configured max)`, never less than one. A
//! dedicated pool (not the global one) keeps the bound per batch, so a
//! session and a CLI run in the same process don't share a cap.
//!
//! ## Progress
//!
//! A single mutex guards the completed counter. The event callback runs while
//! the lock is held, so `completed` values arrive as exactly `1..=total` in
//! emission order, whatever order the files finish in.
//!
//! ## Failures
//!
//! A file that fails to decode or encode never takes down the pool. Under
//! [`ErrorPolicy::Continue`] it is recorded in [`BatchReport::failures`];
//! under [`ErrorPolicy::Abort`] files not yet started are skipped and the run
//! ends with [`BatchError::Aborted`].

use crate::imaging::{
    BackendError, CanvasLayout, Dimensions, FrameSettings, FramedImage, ImageBackend, RustBackend,
    frame_image, plan_frame,
};
use crate::naming::framed_file_name;
use crate::scan::{self, ScanError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on worker threads regardless of core count.
pub const MAX_WORKERS: usize = 8;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("batch aborted after failure on {}: {}", .0.source.display(), .0.error)]
    Aborted(FileFailure),
}

/// What to do when a single file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and keep going.
    #[default]
    Continue,
    /// Stop starting new files and fail the batch.
    Abort,
}

/// One batch run, fully parsed.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub settings: FrameSettings,
    /// Inserted before the extension of every output name.
    pub label: String,
    /// Requested cap on worker threads; `None` means as many as allowed.
    pub max_workers: Option<usize>,
    pub on_error: ErrorPolicy,
}

/// Shared flag for stopping a batch from another thread.
///
/// Checked before each file starts; files already in flight finish normally.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A successfully framed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub source_dimensions: Dimensions,
    pub layout: CanvasLayout,
}

/// A file that could not be framed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Framed(FramedFile),
    Failed(FileFailure),
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Framed(f) => &f.source,
            FileOutcome::Failed(f) => &f.source,
        }
    }
}

/// Progress events emitted while a batch runs.
///
/// Not emitted at all for a folder with nothing to frame.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        total: usize,
        workers: usize,
    },
    FileFinished {
        completed: usize,
        total: usize,
        outcome: FileOutcome,
    },
}

/// Final result of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Eligible files found in the input folder.
    pub total: usize,
    pub framed: Vec<FramedFile>,
    pub failures: Vec<FileFailure>,
    /// Files never started because the batch was cancelled or aborted.
    pub skipped: usize,
}

impl BatchReport {
    /// Number of files written successfully.
    pub fn processed_count(&self) -> usize {
        self.framed.len()
    }

    /// True when the input folder had nothing to frame.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Worker count for a requested maximum: `min(8, cores, max)`, at least 1.
pub fn effective_workers(max_workers: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let cap = MAX_WORKERS.min(cores);
    max_workers.map(|n| n.min(cap)).unwrap_or(cap).max(1)
}

/// Frame every eligible image in `job.input_dir` with the `image` crate backend.
pub fn process_folder(
    job: &BatchJob,
    cancel: &CancelFlag,
    on_event: impl Fn(BatchEvent) + Sync,
) -> Result<BatchReport, BatchError> {
    let backend = RustBackend::new();
    process_folder_with_backend(&backend, job, cancel, on_event)
}

#[derive(Default)]
struct Progress {
    completed: usize,
    first_failure: Option<FileFailure>,
}

/// Process a folder using a specific backend (allows testing with mock).
pub fn process_folder_with_backend(
    backend: &impl ImageBackend,
    job: &BatchJob,
    cancel: &CancelFlag,
    on_event: impl Fn(BatchEvent) + Sync,
) -> Result<BatchReport, BatchError> {
    std::fs::create_dir_all(&job.output_dir)?;

    let sources = scan::eligible_images(&job.input_dir)?;
    let total = sources.len();
    if total == 0 {
        info!(input = %job.input_dir.display(), "no eligible images");
        return Ok(BatchReport::default());
    }

    let workers = effective_workers(job.max_workers);
    info!(
        total,
        workers,
        input = %job.input_dir.display(),
        output = %job.output_dir.display(),
        "framing images"
    );
    on_event(BatchEvent::Started { total, workers });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("frame-worker-{i}"))
        .build()?;

    let progress = Mutex::new(Progress::default());
    let stop = AtomicBool::new(false);

    let outcomes: Vec<Option<FileOutcome>> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| {
                if cancel.is_cancelled() || stop.load(Ordering::SeqCst) {
                    return None;
                }

                let outcome = frame_one(backend, job, source);

                let mut progress = progress.lock().unwrap_or_else(PoisonError::into_inner);
                progress.completed += 1;
                if let FileOutcome::Failed(failure) = &outcome {
                    if job.on_error == ErrorPolicy::Abort {
                        stop.store(true, Ordering::SeqCst);
                    }
                    if progress.first_failure.is_none() {
                        progress.first_failure = Some(failure.clone());
                    }
                }
                on_event(BatchEvent::FileFinished {
                    completed: progress.completed,
                    total,
                    outcome: outcome.clone(),
                });
                Some(outcome)
            })
            .collect()
    });

    let progress = progress.into_inner().unwrap_or_else(PoisonError::into_inner);
    let report = build_report(total, outcomes);

    info!(
        framed = report.processed_count(),
        failed = report.failures.len(),
        skipped = report.skipped,
        "batch finished"
    );

    match progress.first_failure {
        Some(failure) if job.on_error == ErrorPolicy::Abort => Err(BatchError::Aborted(failure)),
        _ => Ok(report),
    }
}

/// Where the framed version of `source` is written.
pub fn output_path(job: &BatchJob, source: &Path) -> PathBuf {
    let file_name = source.file_name().unwrap_or_default();
    job.output_dir.join(framed_file_name(file_name, &job.label))
}

fn frame_one(backend: &impl ImageBackend, job: &BatchJob, source: &Path) -> FileOutcome {
    let output = output_path(job, source);

    match frame_image(backend, source, &output, &job.settings) {
        Ok(framed) => {
            debug!(
                source = %source.display(),
                output = %output.display(),
                width = framed.layout.width,
                height = framed.layout.height,
                "framed"
            );
            FileOutcome::Framed(FramedFile {
                source: source.to_path_buf(),
                output,
                source_dimensions: framed.source,
                layout: framed.layout,
            })
        }
        Err(e) => {
            warn!(source = %source.display(), error = %e, "failed to frame image");
            FileOutcome::Failed(FileFailure {
                source: source.to_path_buf(),
                error: e.to_string(),
            })
        }
    }
}

/// A dry-run entry: what framing `source` would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Planned canvas, or why the file can't be framed.
    pub plan: Result<FramedImage, String>,
}

/// Plan every eligible image without decoding pixels or writing anything.
pub fn plan_folder(job: &BatchJob) -> Result<Vec<PlannedFile>, BatchError> {
    plan_folder_with_backend(&RustBackend::new(), job)
}

/// Plan a folder using a specific backend (allows testing with mock).
pub fn plan_folder_with_backend(
    backend: &impl ImageBackend,
    job: &BatchJob,
) -> Result<Vec<PlannedFile>, BatchError> {
    let sources = scan::eligible_images(&job.input_dir)?;
    Ok(sources
        .into_iter()
        .map(|source| {
            let plan = plan_one(backend, &job.settings, &source);
            PlannedFile {
                output: output_path(job, &source),
                source,
                plan,
            }
        })
        .collect())
}

fn plan_one(
    backend: &impl ImageBackend,
    settings: &FrameSettings,
    source: &Path,
) -> Result<FramedImage, String> {
    let dims = backend.identify(source).map_err(|e| e.to_string())?;
    let layout = plan_frame(dims, settings).ok_or_else(|| {
        BackendError::CanvasTooLarge {
            path: source.to_path_buf(),
        }
        .to_string()
    })?;
    Ok(FramedImage {
        source: dims,
        layout,
    })
}

fn build_report(total: usize, outcomes: Vec<Option<FileOutcome>>) -> BatchReport {
    let mut report = BatchReport {
        total,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Some(FileOutcome::Framed(f)) => report.framed.push(f),
            Some(FileOutcome::Failed(f)) => report.failures.push(f),
            None => report.skipped += 1,
        }
    }
    report
}
