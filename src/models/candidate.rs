use std::path::PathBuf;
use std::time::SystemTime;

/// A regular file eligible for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path:     PathBuf,
    pub modified: SystemTime,
    pub size:     u64,
    /// Estimated block footprint, see `FsSnapshot::footprint`.
    pub blocks:   u64,
}

/// Order candidates oldest modification time first. Ties keep no particular order.
pub fn sort_oldest_first(candidates: &mut [Candidate]) {
    candidates.sort_unstable_by_key(|c| c.modified);
}
