use crate::checksum::try_checksum_file;
use crate::manifest::FileEntry;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// One file's pending checksum computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// Relative to the scan base directory.
    pub path: String,
}

impl Job {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    /// The path vanished or turned into a directory after discovery.
    #[error("{path}: not a regular file ({reason})")]
    Precondition { path: String, reason: String },

    /// Open or read failed while hashing.
    #[error("{path}: read failed: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl JobError {
    pub fn path(&self) -> &str {
        match self {
            JobError::Precondition { path, .. } | JobError::Read { path, .. } => path,
        }
    }
}

pub type JobResult = Result<FileEntry, JobError>;

/// Re-check and hash one file below `base`.
pub fn run_job(base: &Path, job: Job) -> JobResult {
    let full = base.join(&job.path);
    match fs::metadata(&full) {
        Ok(md) if md.is_dir() => {
            return Err(JobError::Precondition { path: job.path, reason: "is a directory".into() })
        }
        Ok(_) => {}
        Err(e) => return Err(JobError::Precondition { path: job.path, reason: e.to_string() }),
    }
    match try_checksum_file(&full) {
        Ok(crc) => Ok(FileEntry { filename: job.path, crc }),
        Err(source) => Err(JobError::Read { path: job.path, source }),
    }
}
