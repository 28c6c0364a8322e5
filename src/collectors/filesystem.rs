use crate::config::Thresholds;
use crate::error::CleanError;
use crate::models::filesystem::{saturate_i64, Deficit, FsSnapshot};
use std::path::Path;

/// Query capacity of the filesystem containing `path`.
pub fn snapshot(path: &Path) -> Result<FsSnapshot, CleanError> {
    use nix::sys::statvfs::statvfs;
    let stat = statvfs(path).map_err(|source| CleanError::Statfs {
        path: path.to_path_buf(),
        source,
    })?;

    // Block counts are in fragment units; some filesystems leave f_frsize at zero.
    let frsize = u64::from(stat.fragment_size());
    let block_size = if frsize > 0 { frsize } else { u64::from(stat.block_size()) };

    Ok(FsSnapshot {
        total_blocks: u64::from(stat.blocks()),
        avail_blocks: u64::from(stat.blocks_available()),
        block_size,
        total_inodes: u64::from(stat.files()),
        avail_inodes: u64::from(stat.files_free()),
    })
}

/// Outcome of comparing a snapshot against the free-space targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub min_blocks_free: i64,
    pub min_inodes_free: i64,
    pub deficit:         Deficit,
    /// Both dimensions are strictly above their minimum; nothing needs deleting.
    pub sufficient:      bool,
}

pub fn assess(snap: &FsSnapshot, thresholds: &Thresholds) -> Assessment {
    let min_blocks = minimum(snap.total_blocks, thresholds.min_size_pct);
    let min_inodes = minimum(snap.total_inodes, thresholds.min_files_pct);
    let avail_blocks = i128::from(snap.avail_blocks);
    let avail_inodes = i128::from(snap.avail_inodes);

    // Strict: sitting exactly on a threshold still counts as short.
    let sufficient = avail_blocks > min_blocks && avail_inodes > min_inodes;

    Assessment {
        min_blocks_free: saturate_i64(min_blocks),
        min_inodes_free: saturate_i64(min_inodes),
        deficit: Deficit {
            blocks: saturate_i64(min_blocks - avail_blocks),
            inodes: saturate_i64(min_inodes - avail_inodes),
        },
        sufficient,
    }
}

/// `total * pct / 100`, truncated toward zero, without overflowing for any u64/i64 input.
fn minimum(total: u64, pct: i64) -> i128 {
    i128::from(total) * i128::from(pct) / 100
}
