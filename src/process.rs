//! Batch resizing.
//!
//! Applies one [`BatchJob`] to many files in parallel. Every file is opened,
//! planned against its own dimensions, resized, and written under the output
//! directory with its original file name and format.
//!
//! ```text
//! photos/a.jpg (4000x3000) ──fit 800x800──▶ out/a.jpg (800x600)
//! photos/b.png (1200x1600) ──fit 800x800──▶ out/b.png (600x800)
//! ```
//!
//! ## Failures
//!
//! A bad job (zero bounds, no target dimension) is rejected before any file
//! is touched. Per-file failures (missing file, unsupported format, write
//! errors) do not stop the batch: they are reported as
//! [`ProcessEvent::Failed`] and show up in the [`BatchSummary`].
//!
//! ## Parallel Processing
//!
//! Files are processed on the global [rayon](https://docs.rs/rayon) pool.
//! Events are streamed over an optional channel as each file finishes, so
//! completion order may differ from input order; the returned summary is
//! always in input order.

use crate::imaging::{
    BackendError, ImageEditor, PlanError, Quality, ResampleFilter, ResizePlan, Size,
    plan_fit_exact, plan_fit_within,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// What to do with every image in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchJob {
    /// Shrink to fit inside `max`, never enlarging.
    FitWithin { max: Size },
    /// Fill exactly `width` × `height`, center-cropping the overhang.
    /// A missing dimension follows each image's aspect ratio.
    FitExact {
        width: Option<u32>,
        height: Option<u32>,
    },
}

impl BatchJob {
    /// Check the job's arguments without any image at hand.
    pub fn validate(&self) -> Result<(), PlanError> {
        let probe = Size::new(1, 1);
        match *self {
            Self::FitWithin { max } => plan_fit_within(probe, max.width, max.height).map(|_| ()),
            Self::FitExact { width, height } => plan_fit_exact(probe, width, height).map(|_| ()),
        }
    }

    fn apply(&self, editor: &mut ImageEditor) -> Result<ResizePlan, BackendError> {
        match *self {
            Self::FitWithin { max } => editor.resize_to_within(max.width, max.height),
            Self::FitExact { width, height } => editor.resize_to(width, height),
        }
    }
}

/// Where and how batch output is written.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    pub quality: Quality,
    pub filter: ResampleFilter,
}

impl BatchOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            quality: Quality::default(),
            filter: ResampleFilter::default(),
        }
    }
}

/// Progress events emitted during batch processing.
///
/// Sent through an optional channel so callers can display progress
/// as files complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessEvent {
    Processed {
        source: PathBuf,
        output: PathBuf,
        from: Size,
        to: Size,
        plan: ResizePlan,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

impl ProcessEvent {
    pub fn source(&self) -> &Path {
        match self {
            Self::Processed { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of a batch, one event per input in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<ProcessEvent>,
}

impl BatchSummary {
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|e| !e.is_failure()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|e| e.is_failure()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProcessEvent> {
        self.outcomes.iter().filter(|e| e.is_failure())
    }
}

/// Resize every file in `inputs` according to `job`.
///
/// When `events` is given, one [`ProcessEvent`] per file is sent as soon as
/// the file is done. The sender is dropped on return, which closes the
/// channel for a consumer thread.
///
/// Inputs that share a file name would write the same output file. Only the
/// first of them is processed; the rest fail without touching the disk.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(files = inputs.len(), out_dir = %options.out_dir.display())
)]
pub fn process_batch(
    inputs: &[PathBuf],
    job: &BatchJob,
    options: &BatchOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    job.validate()?;
    std::fs::create_dir_all(&options.out_dir)?;

    let collisions = output_collisions(inputs);
    let outcomes: Vec<ProcessEvent> = inputs
        .par_iter()
        .zip(&collisions)
        .map_with(events, |tx, (source, collision)| {
            let result = match collision {
                Some(first) => Err(BackendError::from(PlanError::InvalidArgument(format!(
                    "output name collides with {}",
                    first.display()
                )))),
                None => process_one(source, job, options),
            };
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(source = %source.display(), error = %e, "image failed");
                    ProcessEvent::Failed {
                        source: source.clone(),
                        error: e.to_string(),
                    }
                }
            };
            if let Some(tx) = tx {
                tx.send(event.clone()).ok();
            }
            event
        })
        .collect();

    let summary = BatchSummary { outcomes };
    tracing::info!(
        processed = summary.processed_count(),
        failed = summary.failed_count(),
        "batch finished"
    );
    Ok(summary)
}

/// For each input, the earlier input that already claims the same output
/// file name.
fn output_collisions(inputs: &[PathBuf]) -> Vec<Option<&Path>> {
    let mut claimed: HashMap<&OsStr, &Path> = HashMap::new();
    inputs
        .iter()
        .map(|source| {
            let name = source.file_name()?;
            match claimed.entry(name) {
                Entry::Occupied(first) => Some(*first.get()),
                Entry::Vacant(slot) => {
                    slot.insert(source);
                    None
                }
            }
        })
        .collect()
}

fn process_one(
    source: &Path,
    job: &BatchJob,
    options: &BatchOptions,
) -> Result<ProcessEvent, BackendError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| BackendError::NotFound(source.to_path_buf()))?;
    let output = options.out_dir.join(file_name);

    let mut editor = ImageEditor::open(source)?.with_filter(options.filter);
    let from = editor.size();
    let plan = job.apply(&mut editor)?;
    editor.save_as(&output, options.quality)?;
    tracing::debug!(source = %source.display(), %from, to = %editor.size(), "image processed");

    Ok(ProcessEvent::Processed {
        source: source.to_path_buf(),
        output,
        from,
        to: editor.size(),
        plan,
    })
}
