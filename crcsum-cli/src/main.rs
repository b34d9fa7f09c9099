use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crcsum_core::discover::ScanRoot;
use crcsum_core::progress::{NoProgress, ProgressSink, StderrProgress};
use crcsum_core::scan::{scan, ScanConfig, ScanOutcome};
use crcsum_core::verify::verify;

#[derive(Parser)]
#[command(name = "crcsum", version, about = "CRC-32 manifests for files and folders")]
struct Cli {
    /// File or folder to checksum; or manifest json to read with --read
    path: PathBuf,
    /// Save output json (relative paths land in the scanned folder)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Read a crc json file and verify the files it lists
    #[arg(short = 'r', long)]
    read: bool,
    /// Recursively scan folders
    #[arg(short = 'R', long)]
    recursive: bool,
    /// Pretty print json
    #[arg(short = 'p', long = "pretty-output")]
    pretty: bool,
    /// Files hashed at once (default: number of CPUs)
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u32).range(1..=4096))]
    workers: Option<u32>,
    /// Skip relative paths matching this glob (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    force: bool,
    /// Do not print per-file progress
    #[arg(short, long)]
    quiet: bool,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.read {
        verify_cmd(&cli.path)
    } else {
        create(&cli)
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("crcsum=debug,crcsum_core=debug,warn")
        } else {
            EnvFilter::new("crcsum=info,crcsum_core=info,warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn create(cli: &Cli) -> Result<()> {
    let root = ScanRoot::resolve(&cli.path)?;
    let mut cfg = ScanConfig {
        recursive: cli.recursive,
        exclude: cli.exclude.clone(),
        ..ScanConfig::default()
    };
    if let Some(w) = cli.workers {
        cfg.workers = w as usize;
    }
    let sink: &dyn ProgressSink = if cli.quiet { &NoProgress } else { &StderrProgress };

    let report = match scan(&root, &cfg, sink)? {
        ScanOutcome::Empty { .. } => {
            println!("No files found to process.");
            return Ok(());
        }
        ScanOutcome::Complete(r) => r,
    };

    let json = report.manifest.to_json(cli.pretty)?;
    {
        let mut out = io::stdout().lock();
        out.write_all(&json)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    if let Some(output) = &cli.output {
        write_manifest(&root.base.join(output), &json, cli.force)?;
    }
    Ok(())
}

fn write_manifest(dest: &Path, json: &[u8], force: bool) -> Result<()> {
    if dest.exists() && !force {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        if !confirm_overwrite(dest, &mut stdin.lock(), &mut stdout)? {
            println!("Cancelled.");
            return Ok(());
        }
    }
    fs::write(dest, json).with_context(|| format!("write {}", dest.display()))?;
    info!("wrote {}", dest.display());
    Ok(())
}

fn confirm_overwrite<R: BufRead, W: Write>(dest: &Path, input: &mut R, out: &mut W) -> Result<bool> {
    write!(
        out,
        "The file path {} already exists. Do you want to overwrite? (y/N) : ",
        dest.display()
    )?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("read answer")?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

fn verify_cmd(manifest: &Path) -> Result<()> {
    println!("reading crc file {}", manifest.display());
    let report = verify(manifest, |e| println!("{e}"))?;
    if report.all_ok() {
        info!("{} of {} entries OK", report.matched, report.total());
    } else {
        warn!(
            "{} of {} entries OK ({} mismatched, {} unreadable, {} rejected)",
            report.matched,
            report.total(),
            report.mismatched,
            report.unreadable,
            report.rejected
        );
    }
    Ok(())
}
