use crate::aggregate::aggregate_report;
use crate::discover::{discover, DiscoverOptions, ScanRoot};
use crate::job::{run_job, Job, JobError};
use crate::manifest::Manifest;
use crate::pool::WorkerPool;
use crate::progress::ProgressSink;
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct ScanConfig {
    pub recursive: bool,
    /// Upper bound on simultaneously running jobs.
    pub workers: usize,
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { recursive: false, workers: num_cpus::get(), exclude: Vec::new() }
    }
}

#[derive(Debug)]
pub struct ScanReport {
    pub manifest: Manifest,
    /// Number of jobs dispatched.
    pub discovered: usize,
    /// Jobs that produced no entry, sorted by path.
    pub failures: Vec<JobError>,
    pub discovery_errors: Vec<String>,
}

#[derive(Debug)]
pub enum ScanOutcome {
    /// Discovery found nothing; no pool was started.
    Empty { discovery_errors: Vec<String> },
    Complete(ScanReport),
}

/// Discover, hash in parallel, and aggregate into a sorted manifest.
pub fn scan(root: &ScanRoot, cfg: &ScanConfig, sink: &dyn ProgressSink) -> Result<ScanOutcome> {
    let opts = DiscoverOptions { recursive: cfg.recursive, exclude: cfg.exclude.clone() };
    let discovery = discover(root, &opts)?;
    if discovery.is_empty() {
        info!("no files found under {}", root.base.display());
        return Ok(ScanOutcome::Empty { discovery_errors: discovery.errors });
    }

    let pool = WorkerPool::new(cfg.workers)?;
    info!("Starting concurrent processing with {} workers...", pool.workers());

    let discovered = discovery.paths.len();
    let jobs: Vec<Job> = discovery.paths.into_iter().map(Job::new).collect();
    let base = root.base.as_path();
    let results = pool.run(jobs, |job| run_job(base, job), sink);

    let (manifest, failures) = aggregate_report(results);
    for f in &failures {
        warn!("skipped {}", f);
    }
    info!(
        "hashed {} of {} file(s), {} skipped",
        manifest.files.len(),
        discovered,
        failures.len()
    );
    Ok(ScanOutcome::Complete(ScanReport {
        manifest,
        discovered,
        failures,
        discovery_errors: discovery.errors,
    }))
}

pub fn scan_path(path: &Path, cfg: &ScanConfig, sink: &dyn ProgressSink) -> Result<ScanOutcome> {
    let root = ScanRoot::resolve(path)?;
    scan(&root, cfg, sink)
}
