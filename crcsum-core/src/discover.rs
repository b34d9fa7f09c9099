//! Candidate file enumeration.
//!
//! Discovery never hashes anything; it only decides which relative paths
//! become jobs. Per-entry failures are logged and collected, and the walk
//! carries on with whatever else it can reach.

use anyhow::{anyhow, bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// The resolved starting point of a scan.
#[derive(Clone, Debug)]
pub struct ScanRoot {
    /// Directory all job paths are relative to.
    pub base: PathBuf,
    /// Set when the scan was started on a single file inside `base`.
    pub file_name: Option<String>,
}

impl ScanRoot {
    pub fn resolve(path: &Path) -> Result<Self> {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().context("current dir")?.join(path)
        };
        let md = match fs::metadata(&abs) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => bail!("{} not found.", abs.display()),
            Err(e) => return Err(e).with_context(|| format!("stat {}", abs.display())),
        };
        let abs = fs::canonicalize(&abs).with_context(|| format!("resolve {}", abs.display()))?;
        if md.is_dir() {
            return Ok(Self { base: abs, file_name: None });
        }
        let name = abs
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("unsupported file name: {}", abs.display()))?
            .to_string();
        let base = abs
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("{} has no parent directory", abs.display()))?;
        Ok(Self { base, file_name: Some(name) })
    }

    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiscoverOptions {
    pub recursive: bool,
    /// Glob patterns matched against `/`-separated relative paths.
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Discovery {
    /// Relative, `/`-separated, sorted.
    pub paths: Vec<String>,
    /// One message per entry that could not be listed or statted.
    pub errors: Vec<String>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn report(&mut self, msg: String) {
        warn!("{}", msg);
        self.errors.push(msg);
    }
}

fn build_exclude(patterns: &[String]) -> Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("bad exclude pattern {p:?}"))?);
    }
    Ok(b.build()?)
}

/// Join the normal components of `rel` with `/`. `None` for non-UTF-8 names.
fn rel_string(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(s) => parts.push(s.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

pub fn discover(root: &ScanRoot, opts: &DiscoverOptions) -> Result<Discovery> {
    let exclude = build_exclude(&opts.exclude)?;
    let mut d = Discovery::default();

    if opts.recursive {
        // A file root walks the folder that contains it.
        for ent in WalkDir::new(&root.base).min_depth(1) {
            let ent = match ent {
                Ok(e) => e,
                Err(e) => {
                    d.report(format!("walk error: {e}"));
                    continue;
                }
            };
            if ent.file_type().is_dir() {
                continue;
            }
            let rel = pathdiff::diff_paths(ent.path(), &root.base)
                .unwrap_or_else(|| ent.path().to_path_buf());
            match rel_string(&rel) {
                Some(s) => d.paths.push(s),
                None => d.report(format!("skipping unsupported path {}", ent.path().display())),
            }
        }
    } else if let Some(name) = &root.file_name {
        d.paths.push(name.clone());
    } else {
        let rd = fs::read_dir(&root.base)
            .with_context(|| format!("read dir {}", root.base.display()))?;
        for ent in rd {
            let ent = match ent {
                Ok(e) => e,
                Err(e) => {
                    d.report(format!("read dir entry in {}: {e}", root.base.display()));
                    continue;
                }
            };
            match ent.file_type() {
                Ok(ft) if ft.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    d.report(format!("stat {}: {e}", ent.path().display()));
                    continue;
                }
            }
            match ent.file_name().to_str() {
                Some(s) => d.paths.push(s.to_string()),
                None => d.report(format!("skipping unsupported path {}", ent.path().display())),
            }
        }
    }

    if !exclude.is_empty() {
        d.paths.retain(|p| !exclude.is_match(p));
    }
    d.paths.sort();
    debug!(
        "discovered {} file(s) under {} ({} error(s))",
        d.paths.len(),
        root.base.display(),
        d.errors.len()
    );
    Ok(d)
}
