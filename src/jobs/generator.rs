use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::FrameSink;
use crate::foundation::error::{TripError, TripResult};
use crate::jobs::store::{JobRecord, JobStatus, JobStore};
use crate::scene::config::RunConfig;
use crate::scene::media::MediaDescriptor;
use crate::session::run::{RunOutcome, render_run};

pub const DEFAULT_URL_PREFIX: &str = "/uploads";

/// Configuration of the job layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Directory receiving `trip_{id}_{style}.mp4` artifacts.
    pub output_dir: PathBuf,
    /// Public URL prefix under which `output_dir` is served.
    pub url_prefix: String,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Base run configuration. The output path and style are set per job.
    pub run: RunConfig,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads"),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            threads: None,
            run: RunConfig::default(),
        }
    }
}

/// Creates a fresh sink for every job.
pub trait SinkFactory: Send + Sync {
    fn make_sink(&self, cfg: &RunConfig) -> Box<dyn FrameSink>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegSinkFactory;

impl SinkFactory for FfmpegSinkFactory {
    fn make_sink(&self, cfg: &RunConfig) -> Box<dyn FrameSink> {
        Box::new(FfmpegSink::new(FfmpegSinkOpts {
            overwrite: cfg.overwrite,
        }))
    }
}

/// Inputs of one job, captured by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub job_id: u64,
    pub media: Vec<MediaDescriptor>,
    pub style: String,
    pub title: Option<String>,
}

/// Handle to a submitted job.
#[derive(Debug)]
pub struct GenerationHandle {
    job_id: u64,
    rx: mpsc::Receiver<RunOutcome>,
}

impl GenerationHandle {
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Block until the job has written its terminal status.
    pub fn wait(self) -> TripResult<RunOutcome> {
        self.rx.recv().map_err(|_| {
            TripError::Other(anyhow::anyhow!(
                "generation worker for job {} exited without an outcome",
                self.job_id
            ))
        })
    }
}

/// Runs generation jobs on a worker pool and records their status.
pub struct VideoGenerator {
    settings: GeneratorSettings,
    store: Arc<dyn JobStore>,
    sinks: Arc<dyn SinkFactory>,
    pool: rayon::ThreadPool,
}

impl VideoGenerator {
    pub fn new(settings: GeneratorSettings, store: Arc<dyn JobStore>) -> TripResult<Self> {
        Self::with_sink_factory(settings, store, Arc::new(FfmpegSinkFactory))
    }

    pub fn with_sink_factory(
        settings: GeneratorSettings,
        store: Arc<dyn JobStore>,
        sinks: Arc<dyn SinkFactory>,
    ) -> TripResult<Self> {
        settings.run.validate()?;
        let pool = build_thread_pool(settings.threads)?;
        Ok(Self {
            settings,
            store,
            sinks,
            pool,
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Output path of a job's artifact.
    pub fn artifact_path(&self, job_id: u64, style: &str) -> PathBuf {
        self.settings
            .output_dir
            .join(artifact_filename(job_id, style))
    }

    /// Validate `req`, mark the job `processing` and start it in the background.
    ///
    /// An empty media list is rejected here and leaves the job record untouched.
    pub fn submit(&self, req: GenerationRequest) -> TripResult<GenerationHandle> {
        if req.media.is_empty() {
            return Err(TripError::rejected(format!(
                "job {} has no media items to process",
                req.job_id
            )));
        }

        let mut record = self
            .store
            .get(req.job_id)
            .unwrap_or_else(|| JobRecord::draft(req.job_id));
        record.status = JobStatus::Processing;
        record.style = req.style.clone();
        record.title = req.title.clone();
        record.artifact_url = None;
        self.store.put(record);

        let cfg = RunConfig {
            output_path: self.artifact_path(req.job_id, &req.style),
            style_name: req.style.clone(),
            ..self.settings.run.clone()
        };
        let url = artifact_url(
            &self.settings.url_prefix,
            &artifact_filename(req.job_id, &req.style),
        );
        let store = Arc::clone(&self.store);
        let sinks = Arc::clone(&self.sinks);
        let (tx, rx) = mpsc::channel();
        let job_id = req.job_id;

        tracing::info!(
            job = job_id,
            style = %req.style,
            items = req.media.len(),
            "job submitted"
        );
        self.pool.spawn(move || {
            let outcome = run_job(&cfg, &req, sinks.as_ref());
            finish_job(store.as_ref(), job_id, &outcome, &url);
            // The handle may have been dropped.
            let _ = tx.send(outcome);
        });

        Ok(GenerationHandle { job_id, rx })
    }
}

fn run_job(cfg: &RunConfig, req: &GenerationRequest, sinks: &dyn SinkFactory) -> RunOutcome {
    let owned_output = cfg.overwrite || !cfg.output_path.exists();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut sink = sinks.make_sink(cfg);
        render_run(cfg, &req.media, req.title.as_deref(), sink.as_mut())
    }));
    let outcome = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => RunOutcome {
            success: false,
            output_path: cfg.output_path.clone(),
            frames_written: 0,
            skipped_items: 0,
            failure_reason: Some(e.to_string()),
        },
        Err(_) => RunOutcome {
            success: false,
            output_path: cfg.output_path.clone(),
            frames_written: 0,
            skipped_items: 0,
            failure_reason: Some("generation worker panicked".to_string()),
        },
    };
    if !outcome.success && owned_output {
        remove_partial_output(&cfg.output_path);
    }
    outcome
}

/// Write the single terminal status of a job.
fn finish_job(store: &dyn JobStore, job_id: u64, outcome: &RunOutcome, url: &str) {
    let mut record = store.get(job_id).unwrap_or_else(|| JobRecord::draft(job_id));
    if record.status.is_terminal() {
        tracing::warn!(job = job_id, status = %record.status, "overwriting a finished job");
    }
    if outcome.success {
        record.status = JobStatus::Completed;
        record.artifact_url = Some(url.to_string());
        tracing::info!(
            job = job_id,
            frames = outcome.frames_written,
            skipped = outcome.skipped_items,
            url,
            "job completed"
        );
    } else {
        record.status = JobStatus::Failed;
        record.artifact_url = None;
        tracing::warn!(
            job = job_id,
            reason = outcome.failure_reason.as_deref().unwrap_or("unknown"),
            "job failed"
        );
    }
    store.put(record);
}

fn remove_partial_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}

/// `trip_{id}_{style}.mp4`, with the style reduced to `[a-z0-9_-]`.
pub fn artifact_filename(job_id: u64, style: &str) -> String {
    let mut clean: String = style
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.is_empty() {
        clean.push_str("none");
    }
    format!("trip_{job_id}_{clean}.mp4")
}

pub fn artifact_url(prefix: &str, filename: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), filename)
}

fn build_thread_pool(threads: Option<usize>) -> TripResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TripError::validation(
            "generator 'threads' must be >= 1 when set",
        ));
    }
    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("triptales-job-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TripError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/generator.rs"]
mod tests;
