use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve a manifest filename under `root`, refusing anything that could
/// point outside it: absolute paths, drive prefixes, and `..` components.
pub fn resolve_under(root: &Path, rel: &str) -> Result<PathBuf> {
    if rel.is_empty() {
        bail!("empty filename");
    }
    let relp = Path::new(rel);
    for comp in relp.components() {
        match comp {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => bail!("parent traversal not allowed: {rel:?}"),
            Component::RootDir | Component::Prefix(_) => {
                bail!("absolute paths are not allowed: {rel:?}")
            }
        }
    }
    Ok(root.join(relp))
}
