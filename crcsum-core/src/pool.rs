//! Bounded worker pool.
//!
//! A dedicated rayon pool with exactly `workers` threads runs the jobs, so
//! no more than `workers` jobs are ever active at once. Jobs are split one
//! per task and a new job only starts when a thread frees up; the job list
//! itself is the only queue.

use crate::progress::{ProgressCounter, ProgressSink};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use tracing::debug;

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            bail!("worker count must be at least 1");
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("crcsum-worker-{i}"))
            .build()
            .context("build worker pool")?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job_fn` once per job and return one result per job.
    ///
    /// Every completion bumps a shared counter; sampled values are passed to
    /// `sink` from whichever worker produced them. Returns only after all
    /// jobs have finished. Result order is unspecified.
    pub fn run<T, R, F>(&self, jobs: Vec<T>, job_fn: F, sink: &dyn ProgressSink) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let counter = ProgressCounter::new(jobs.len());
        debug!("dispatching {} job(s) to {} worker(s)", counter.total(), self.workers);
        let results: Vec<R> = self.pool.install(|| {
            jobs.into_par_iter()
                .with_max_len(1)
                .map(|job| {
                    let r = job_fn(job);
                    if let Some(u) = counter.complete_one() {
                        sink.update(u);
                    }
                    r
                })
                .collect()
        });
        debug!("pool drained: {}/{} job(s) completed", counter.completed(), counter.total());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, ProgressUpdate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn zero_workers_rejected() {
        assert!(WorkerPool::new(0).is_err());
    }

    #[test]
    fn active_jobs_never_exceed_worker_count() {
        let pool = WorkerPool::new(3).unwrap();
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let out = pool.run(
            (0..40).collect(),
            |i: u32| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(3));
                active.fetch_sub(1, Ordering::SeqCst);
                i * 2
            },
            &NoProgress,
        );
        assert_eq!(out.len(), 40);
        assert!(peak.load(Ordering::SeqCst) <= 3, "peak {}", peak.load(Ordering::SeqCst));
        let mut out = out;
        out.sort_unstable();
        assert_eq!(out, (0..40).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn progress_reports_final_completion() {
        let pool = WorkerPool::new(4).unwrap();
        let seen = Mutex::new(Vec::new());
        let sink = |u: ProgressUpdate| seen.lock().unwrap().push(u.completed);
        pool.run((0..250).collect(), |i: usize| i, &sink);
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        let expected: Vec<usize> = (1..=25).map(|i| i * 10).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn single_worker_runs_everything() {
        let pool = WorkerPool::new(1).unwrap();
        let out = pool.run(vec!["a", "b", "c"], |s: &str| s.len(), &NoProgress);
        assert_eq!(out, vec![1, 1, 1]);
    }
}
