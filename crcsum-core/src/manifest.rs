use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Tool version stamped into every manifest.
pub const VERSION: &str = "1.0.0";
/// Provenance tag kept for compatibility with manifests produced by zlib-based tools.
pub const ZLIB_VERSION: &str = "1.2.11";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub crc: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub files: Vec<FileEntry>,
    /// Provenance only; manifests from other tools may leave these out.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub zlib_version: String,
}

impl Manifest {
    /// Build a manifest from entries that are already in their final order.
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self { files, version: VERSION.to_string(), zlib_version: ZLIB_VERSION.to_string() }
    }

    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        serde_json::from_reader(r).context("parse manifest json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open manifest {}", path.display()))?;
        Self::from_reader(BufReader::new(f))
            .with_context(|| format!("read manifest {}", path.display()))
    }

    /// Render as JSON; `pretty` uses four-space indentation.
    pub fn to_json(&self, pretty: bool) -> Result<Vec<u8>> {
        if !pretty {
            return serde_json::to_vec(self).context("serialize manifest");
        }
        let mut out = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
        self.serialize(&mut ser).context("serialize manifest")?;
        Ok(out)
    }
}
