//! Re-check a manifest against the files next to it.
//!
//! Entries are processed one after another in manifest order so the status
//! lines come out in a stable order. Nothing short of an unreadable
//! manifest stops the run.

use crate::checksum::try_checksum_file;
use crate::manifest::{FileEntry, Manifest};
use crate::path_safety::resolve_under;
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyStatus {
    Match,
    Mismatch,
    /// Open or read failed; `actual` is reported as 0.
    Unreadable,
    /// The filename points outside the manifest directory and was not opened.
    Rejected,
}

impl VerifyStatus {
    pub fn tag(self) -> &'static str {
        match self {
            VerifyStatus::Match => "OK",
            _ => "XX",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyEntry {
    pub filename: String,
    pub expected: u32,
    pub actual: u32,
    pub status: VerifyStatus,
}

impl fmt::Display for VerifyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} == {} : {}",
            self.status.tag(),
            self.expected,
            self.actual,
            self.filename
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub matched: usize,
    pub mismatched: usize,
    pub unreadable: usize,
    pub rejected: usize,
}

impl VerifyReport {
    pub fn total(&self) -> usize {
        self.matched + self.mismatched + self.unreadable + self.rejected
    }

    pub fn all_ok(&self) -> bool {
        self.matched == self.total()
    }

    fn record(&mut self, status: VerifyStatus) {
        match status {
            VerifyStatus::Match => self.matched += 1,
            VerifyStatus::Mismatch => self.mismatched += 1,
            VerifyStatus::Unreadable => self.unreadable += 1,
            VerifyStatus::Rejected => self.rejected += 1,
        }
    }
}

fn check_entry(root: &Path, fe: &FileEntry) -> VerifyEntry {
    let (actual, status) = match resolve_under(root, &fe.filename) {
        Err(e) => {
            warn!("not checking {:?}: {:#}", fe.filename, e);
            (0, VerifyStatus::Rejected)
        }
        Ok(p) => match try_checksum_file(&p) {
            Ok(c) if c == fe.crc => (c, VerifyStatus::Match),
            Ok(c) => (c, VerifyStatus::Mismatch),
            Err(e) => {
                warn!("cannot read {}: {}", p.display(), e);
                (0, VerifyStatus::Unreadable)
            }
        },
    };
    VerifyEntry { filename: fe.filename.clone(), expected: fe.crc, actual, status }
}

/// Check every entry of `mf` relative to `root`, calling `on_entry` as each one finishes.
pub fn verify_manifest<F>(mf: &Manifest, root: &Path, mut on_entry: F) -> VerifyReport
where
    F: FnMut(&VerifyEntry),
{
    let mut report = VerifyReport::default();
    for fe in &mf.files {
        let ve = check_entry(root, fe);
        report.record(ve.status);
        on_entry(&ve);
    }
    debug!(
        "verified {} entr(ies): {} ok, {} mismatched, {} unreadable, {} rejected",
        report.total(),
        report.matched,
        report.mismatched,
        report.unreadable,
        report.rejected
    );
    report
}

/// Directory that manifest filenames are relative to.
pub fn manifest_root(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn verify<F>(manifest_path: &Path, on_entry: F) -> Result<VerifyReport>
where
    F: FnMut(&VerifyEntry),
{
    let mf = Manifest::load(manifest_path)?;
    Ok(verify_manifest(&mf, &manifest_root(manifest_path), on_entry))
}
