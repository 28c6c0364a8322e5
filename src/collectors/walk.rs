use crate::error::CleanError;
use crate::models::candidate::Candidate;
use crate::models::filesystem::FsSnapshot;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Collect every regular file under `root`, recursively.
///
/// Symlinks are not followed and, like devices and sockets, are never candidates. Directories
/// are descended into. The first error reading any entry aborts the whole walk.
pub fn collect_candidates(root: &Path, snap: &FsSnapshot) -> Result<Vec<Candidate>, CleanError> {
    let mut out = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() { continue; }

        let meta = entry.metadata()?;
        let modified = meta.modified().map_err(|source| CleanError::Metadata {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let size = meta.len();

        out.push(Candidate {
            path: entry.into_path(),
            modified,
            size,
            blocks: snap.footprint(size),
        });
    }

    debug!(root = %root.display(), candidates = out.len(), "walk finished");
    Ok(out)
}
