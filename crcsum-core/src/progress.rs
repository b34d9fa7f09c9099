use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Jobs below this total report every completion; above it, every tenth.
const DENSE_REPORT_LIMIT: usize = 100;
const SPARSE_REPORT_EVERY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processed [{} / {}] ({:.2}%)", self.completed, self.total, self.percent)
    }
}

/// Receives sampled progress from pool workers, possibly from several threads at once.
pub trait ProgressSink: Sync {
    fn update(&self, u: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Sync,
{
    fn update(&self, u: ProgressUpdate) {
        self(u)
    }
}

/// Prints progress lines to stderr; stdout is reserved for the manifest.
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn update(&self, u: ProgressUpdate) {
        eprintln!("{u}");
    }
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _u: ProgressUpdate) {}
}

pub fn should_report(completed: usize, total: usize) -> bool {
    total < DENSE_REPORT_LIMIT || completed % SPARSE_REPORT_EVERY == 0 || completed == total
}

/// Completed-job counter shared by every worker of one pool run.
pub struct ProgressCounter {
    done: AtomicUsize,
    total: usize,
}

impl ProgressCounter {
    pub fn new(total: usize) -> Self {
        Self { done: AtomicUsize::new(0), total }
    }

    /// Count one finished job. Returns an update when the new value is sampled.
    pub fn complete_one(&self) -> Option<ProgressUpdate> {
        let completed = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        if !should_report(completed, self.total) {
            return None;
        }
        let percent = completed as f64 / self.total as f64 * 100.0;
        Some(ProgressUpdate { completed, total: self.total, percent })
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
