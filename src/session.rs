//! Interactive batch sessions.
//!
//! A front end (a desktop form, a TUI, anything with an event loop) owns a
//! [`FormState`] and edits its text fields freely. Nothing is read until
//! [`FormState::submit`], which:
//!
//! 1. parses every field, returning parameter errors right away,
//! 2. creates the input folder if it doesn't exist yet,
//! 3. starts the batch on a background thread and returns a [`SessionHandle`].
//!
//! The front end then drains [`SessionMessage`]s from the handle without ever
//! blocking on the batch itself:
//!
//! ```text
//! Progress{0, N} → Progress{1, N} → … → Progress{N, N} → Finished(Summary)
//!                                                       or Failed(message)
//! ```
//!
//! Every session sends exactly one terminal message.

use crate::batch::{
    BatchEvent, BatchJob, BatchReport, CancelFlag, ErrorPolicy, process_folder,
};
use crate::config::{ConfigError, FrameConfig, FrameSection};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("quality must be a whole number between 1 and 100, got {0:?}")]
    InvalidQuality(String),
    #[error("{0} folder must not be empty")]
    MissingFolder(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub input_dir: String,
    pub output_dir: String,
    pub aspect: String,
    pub thickness: String,
    pub color: String,
    pub quality: String,
    pub label: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self::from_config(&FrameConfig::default())
    }
}

impl FormState {
    /// Pre-fill the form from a loaded config.
    pub fn from_config(config: &FrameConfig) -> Self {
        let frame = &config.frame;
        Self {
            input_dir: "input".to_string(),
            output_dir: "output".to_string(),
            aspect: frame.aspect.clone(),
            thickness: frame.thickness.clone(),
            color: frame.color.clone(),
            quality: frame.quality.to_string(),
            label: frame.label.clone(),
        }
    }

    /// Parse the form into a batch job without touching the filesystem.
    pub fn to_job(&self) -> Result<BatchJob, SessionError> {
        let input_dir = self.input_dir.trim();
        if input_dir.is_empty() {
            return Err(SessionError::MissingFolder("input"));
        }
        let output_dir = self.output_dir.trim();
        if output_dir.is_empty() {
            return Err(SessionError::MissingFolder("output"));
        }
        let quality = self
            .quality
            .trim()
            .parse::<u32>()
            .map_err(|_| SessionError::InvalidQuality(self.quality.clone()))?;

        let section = FrameSection {
            aspect: self.aspect.clone(),
            thickness: self.thickness.clone(),
            color: self.color.clone(),
            quality,
            label: self.label.trim().to_string(),
        };
        let settings = section.settings()?;

        Ok(BatchJob {
            input_dir: PathBuf::from(input_dir),
            output_dir: PathBuf::from(output_dir),
            settings,
            label: section.label,
            max_workers: None,
            on_error: ErrorPolicy::Continue,
        })
    }

    /// Validate the form and start the batch in the background.
    pub fn submit(&self) -> Result<SessionHandle, SessionError> {
        let job = self.to_job()?;
        std::fs::create_dir_all(&job.input_dir)?;
        SessionHandle::spawn(job)
    }
}

/// How a finished session turned out.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// The input folder had no eligible images.
    NothingToDo,
    Completed(BatchReport),
}

impl Summary {
    pub fn processed_count(&self) -> usize {
        match self {
            Summary::NothingToDo => 0,
            Summary::Completed(report) => report.processed_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionMessage {
    Progress { completed: usize, total: usize },
    Finished(Summary),
    Failed(String),
}

impl SessionMessage {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionMessage::Progress { .. })
    }
}

fn progress_message(event: &BatchEvent) -> SessionMessage {
    match event {
        BatchEvent::Started { total, .. } => SessionMessage::Progress {
            completed: 0,
            total: *total,
        },
        BatchEvent::FileFinished {
            completed, total, ..
        } => SessionMessage::Progress {
            completed: *completed,
            total: *total,
        },
    }
}

/// A running (or finished) background batch.
pub struct SessionHandle {
    messages: Receiver<SessionMessage>,
    cancel: CancelFlag,
    thread: JoinHandle<()>,
}

impl SessionHandle {
    fn spawn(job: BatchJob) -> Result<Self, SessionError> {
        let (tx, rx) = mpsc::channel();
        let cancel = CancelFlag::new();
        let worker_cancel = cancel.clone();

        let thread = std::thread::Builder::new()
            .name("frame-session".to_string())
            .spawn(move || {
                let progress_tx = tx.clone();
                let result = process_folder(&job, &worker_cancel, move |event| {
                    // Receiver gone means the front end stopped listening
                    progress_tx.send(progress_message(&event)).ok();
                });
                let terminal = match result {
                    Ok(report) if report.is_empty() => SessionMessage::Finished(Summary::NothingToDo),
                    Ok(report) => SessionMessage::Finished(Summary::Completed(report)),
                    Err(e) => SessionMessage::Failed(e.to_string()),
                };
                debug!(?terminal, "session finished");
                tx.send(terminal).ok();
            })?;

        Ok(Self {
            messages: rx,
            cancel,
            thread,
        })
    }

    /// Blocking access to the message stream.
    pub fn messages(&self) -> &Receiver<SessionMessage> {
        &self.messages
    }

    /// Everything received since the last poll, without blocking.
    pub fn poll(&self) -> Vec<SessionMessage> {
        self.messages.try_iter().collect()
    }

    /// Ask the batch to stop starting new files.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the session ends and return its terminal result.
    pub fn wait(self) -> Result<Summary, String> {
        let mut terminal = None;
        for message in self.messages.iter() {
            match message {
                SessionMessage::Finished(summary) => terminal = Some(Ok(summary)),
                SessionMessage::Failed(error) => terminal = Some(Err(error)),
                SessionMessage::Progress { .. } => {}
            }
        }
        self.thread.join().ok();
        terminal.unwrap_or_else(|| Err("session ended without a result".to_string()))
    }
}
