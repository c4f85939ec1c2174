//! Fan-out of template jobs against one shared base image.
//!
//! Every job reads the same immutable base and owns its own composite, so
//! jobs need no synchronization. Results come back in job order. The first
//! failing job aborts the run; no partial result set is returned.

use crate::image::{BinaryImage, OwnedImage};
use crate::merge::{merge_composites, render_mask};
use crate::search::{Composite, Matcher, ScanConfig};
use crate::template::{MatchSettings, Method};
use crate::trace::{trace_event, trace_span};
use crate::util::{BinMatchError, BinMatchResult};
use std::time::Duration;

/// One prepared template with its scoring method and settings.
#[derive(Clone, Debug)]
pub struct MatchJob {
    pub template: BinaryImage,
    pub method: Method,
    pub settings: MatchSettings,
}

impl MatchJob {
    /// Creates a weighted XOR job.
    pub fn new(template: BinaryImage, settings: MatchSettings) -> Self {
        Self {
            template,
            method: Method::XorWeighted,
            settings,
        }
    }
}

/// Dispatch options for [`run_all`].
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Run jobs concurrently (requires the `rayon` feature).
    pub parallel: bool,
    /// Worker cap; `None` runs one worker per job.
    pub max_workers: Option<usize>,
    /// Per-job time budget; `None` disables it.
    pub job_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_workers: None,
            job_timeout: None,
        }
    }
}

impl OrchestratorConfig {
    /// Checks the worker cap.
    pub fn validate(&self) -> BinMatchResult<()> {
        if self.max_workers == Some(0) {
            return Err(BinMatchError::config("max_workers must be at least 1"));
        }
        Ok(())
    }
}

/// Runs every job against `base` and returns one composite per job, in order.
pub fn run_all(
    base: &BinaryImage,
    jobs: &[MatchJob],
    cfg: &OrchestratorConfig,
) -> BinMatchResult<Vec<Composite>> {
    cfg.validate()?;
    let _span = trace_span!("run_all", jobs = jobs.len(), parallel = cfg.parallel).entered();

    let composites = if cfg.parallel && jobs.len() > 1 {
        run_parallel(base, jobs, cfg)?
    } else {
        run_sequential(base, jobs, cfg)?
    };
    trace_event!("jobs_complete", jobs = composites.len());
    Ok(composites)
}

fn run_sequential(
    base: &BinaryImage,
    jobs: &[MatchJob],
    cfg: &OrchestratorConfig,
) -> BinMatchResult<Vec<Composite>> {
    jobs.iter()
        .enumerate()
        .map(|(idx, job)| run_job(base, idx, job, cfg))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn run_parallel(
    base: &BinaryImage,
    jobs: &[MatchJob],
    cfg: &OrchestratorConfig,
) -> BinMatchResult<Vec<Composite>> {
    run_sequential(base, jobs, cfg)
}

#[cfg(feature = "rayon")]
fn run_parallel(
    base: &BinaryImage,
    jobs: &[MatchJob],
    cfg: &OrchestratorConfig,
) -> BinMatchResult<Vec<Composite>> {
    use rayon::prelude::*;

    let workers = cfg.max_workers.unwrap_or(jobs.len()).min(jobs.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("binmatch-job-{idx}"))
        .build()
        .map_err(|err| BinMatchError::WorkerPool {
            reason: err.to_string(),
        })?;
    trace_event!("worker_pool", workers = workers);

    pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(idx, job)| run_job(base, idx, job, cfg))
            .collect()
    })
}

fn run_job(
    base: &BinaryImage,
    idx: usize,
    job: &MatchJob,
    cfg: &OrchestratorConfig,
) -> BinMatchResult<Composite> {
    let _span = trace_span!("match_job", job = idx, method = job.method.as_str()).entered();
    let result = match job.method {
        Method::XorWeighted => Matcher::new(&job.template, &job.settings)
            .with_config(ScanConfig {
                timeout: cfg.job_timeout,
                ..ScanConfig::default()
            })
            .match_image(base),
    };
    result.map_err(|source| BinMatchError::MatchJob {
        job: idx,
        source: Box::new(source),
    })
}

/// Runs all jobs, merges their composites, and renders the {0, 255} output.
pub fn detect(
    base: &BinaryImage,
    jobs: &[MatchJob],
    cfg: &OrchestratorConfig,
) -> BinMatchResult<OwnedImage> {
    let composites = run_all(base, jobs, cfg)?;
    let merged = merge_composites(base.width(), base.height(), composites)?;
    Ok(render_mask(&merged))
}
