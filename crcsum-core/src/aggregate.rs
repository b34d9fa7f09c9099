use crate::job::{JobError, JobResult};
use crate::manifest::{FileEntry, Manifest};

/// Sort entries by filename, byte-wise ascending. Equal names keep their relative order.
pub fn sort_entries(files: &mut [FileEntry]) {
    files.sort_by(|a, b| a.filename.as_bytes().cmp(b.filename.as_bytes()));
}

/// Split job results into a sorted manifest and the failures it leaves out.
pub fn aggregate_report(results: Vec<JobResult>) -> (Manifest, Vec<JobError>) {
    let mut files = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for r in results {
        match r {
            Ok(entry) => files.push(entry),
            Err(e) => failures.push(e),
        }
    }
    sort_entries(&mut files);
    failures.sort_by(|a, b| a.path().cmp(b.path()));
    (Manifest::new(files), failures)
}

/// Failed jobs are dropped; the manifest only lists files that hashed.
/// Convenience API for callers that do not need the failure list; `scan`
/// uses [`aggregate_report`].
pub fn aggregate(results: Vec<JobResult>) -> Manifest {
    aggregate_report(results).0
}
