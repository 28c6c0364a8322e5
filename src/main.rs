mod collectors;
mod config;
mod error;
mod evict;
mod models;
mod util;

use anyhow::Result;
use clap::Parser;
use collectors::filesystem::{self, Assessment};
use config::{Config, Thresholds};
use evict::EvictionReport;
use models::filesystem::FsSnapshot;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use util::human::{fmt_bytes, fmt_pct};

#[derive(Parser, Debug)]
#[command(
    name = "dclean",
    about = "Delete the oldest files under a directory until its filesystem has enough free blocks and inodes",
    version
)]
struct Cli {
    /// Directory to clean
    #[arg(required_unless_present = "config")]
    path: Option<PathBuf>,

    /// Percentage of space to keep free [default: 25]
    #[arg(long, allow_negative_numbers = true)]
    min_size_pct: Option<i64>,

    /// Percentage of files (inodes) to keep free [default: 25]
    #[arg(long, allow_negative_numbers = true)]
    min_files_pct: Option<i64>,

    /// Print a JSON summary of the run on stdout
    #[arg(long)]
    json: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Log every deletion
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load();

    if cli.config {
        run_print_config(&cfg);
        return Ok(());
    }

    util::logging::init(if cli.verbose { "debug" } else { &cfg.logging.level });

    let Some(path) = cli.path.as_deref() else {
        anyhow::bail!("no path given");
    };
    let thresholds = cfg.thresholds.with_overrides(cli.min_size_pct, cli.min_files_pct);
    run(path, &thresholds, cli.json)
}

fn run(path: &Path, thresholds: &Thresholds, json: bool) -> Result<()> {
    use collectors::walk;
    use models::candidate::sort_oldest_first;

    let snap = filesystem::snapshot(path)?;
    let assessment = filesystem::assess(&snap, thresholds);
    info!(
        path = %path.display(),
        avail = %fmt_pct(snap.avail_pct()),
        avail_inodes = %fmt_pct(snap.avail_inode_pct()),
        need_blocks = assessment.deficit.blocks,
        need_files = assessment.deficit.inodes,
        "filesystem checked"
    );

    if assessment.sufficient {
        info!("enough free space and inodes, nothing to do");
        if json {
            print_json(path, thresholds, &snap, &assessment, None)?;
        }
        return Ok(());
    }

    let mut candidates = walk::collect_candidates(path, &snap)?;
    sort_oldest_first(&mut candidates);
    info!(candidates = candidates.len(), "cleaning oldest files first");

    let report = evict::evict(&candidates, assessment.deficit);
    info!(
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        blocks_freed = report.blocks_freed,
        freed = %fmt_bytes(report.bytes_freed),
        "done"
    );
    if !report.satisfied() {
        info!(
            need_blocks = report.remaining.blocks,
            need_files = report.remaining.inodes,
            "ran out of files before reaching the targets"
        );
    }

    if json {
        print_json(path, thresholds, &snap, &assessment, Some(&report))?;
    }
    Ok(())
}

fn print_json(
    path: &Path,
    thresholds: &Thresholds,
    snap: &FsSnapshot,
    assessment: &Assessment,
    report: Option<&EvictionReport>,
) -> Result<()> {
    let summary = json_summary(path, thresholds, snap, assessment, report);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn json_summary(
    path: &Path,
    thresholds: &Thresholds,
    snap: &FsSnapshot,
    assessment: &Assessment,
    report: Option<&EvictionReport>,
) -> Value {
    let report = report.map(|r| {
        json!({
            "deleted": r.deleted.iter().map(|c| json!({
                "path":     c.path.to_string_lossy(),
                "modified": chrono::DateTime::<chrono::Local>::from(c.modified).to_rfc3339(),
                "size":     c.size,
                "blocks":   c.blocks,
            })).collect::<Vec<_>>(),
            "failed": r.failed.iter().map(|f| json!({
                "path":  f.path.to_string_lossy(),
                "error": f.message,
            })).collect::<Vec<_>>(),
            "blocks_freed":    r.blocks_freed,
            "bytes_freed":     r.bytes_freed,
            "bytes_freed_hr":  fmt_bytes(r.bytes_freed),
            "remaining": {
                "blocks": r.remaining.blocks,
                "inodes": r.remaining.inodes,
            },
            "satisfied": r.satisfied(),
        })
    });

    json!({
        "dclean_version": env!("CARGO_PKG_VERSION"),
        "timestamp":      chrono::Local::now().to_rfc3339(),
        "path":           path.to_string_lossy(),
        "filesystem": {
            "total_blocks": snap.total_blocks,
            "avail_blocks": snap.avail_blocks,
            "block_size":   snap.block_size,
            "total_inodes": snap.total_inodes,
            "avail_inodes": snap.avail_inodes,
            "avail_hr":     fmt_bytes(snap.avail_bytes()),
            "total_hr":     fmt_bytes(snap.total_bytes()),
        },
        "thresholds": {
            "min_size_pct":    thresholds.min_size_pct,
            "min_files_pct":   thresholds.min_files_pct,
            "min_blocks_free": assessment.min_blocks_free,
            "min_inodes_free": assessment.min_inodes_free,
        },
        "deficit": {
            "blocks": assessment.deficit.blocks,
            "inodes": assessment.deficit.inodes,
        },
        "action": if assessment.sufficient { "none" } else { "evict" },
        "report": report,
    })
}

fn run_print_config(cfg: &Config) {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[thresholds]");
    println!("  min_size_pct  = {}%", cfg.thresholds.min_size_pct);
    println!("  min_files_pct = {}%", cfg.thresholds.min_files_pct);
    println!();
    println!("[logging]");
    println!("  level = {}", cfg.logging.level);
}
