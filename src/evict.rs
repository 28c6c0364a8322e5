use crate::error::CleanError;
use crate::models::candidate::Candidate;
use crate::models::filesystem::Deficit;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A file that could not be removed.
#[derive(Debug)]
pub struct Failure {
    pub path:    PathBuf,
    pub message: String,
}

/// What one eviction pass did.
#[derive(Debug, Default)]
pub struct EvictionReport {
    /// Deleted files, in deletion order.
    pub deleted:      Vec<Candidate>,
    pub failed:       Vec<Failure>,
    pub blocks_freed: u64,
    pub bytes_freed:  u64,
    /// Deficit left after the pass; only positive when candidates ran out.
    pub remaining:    Deficit,
}

impl EvictionReport {
    pub fn satisfied(&self) -> bool {
        self.remaining.is_cleared()
    }
}

/// Delete `candidates` in order until both counters of `deficit` are at or below zero.
///
/// Candidates must already be sorted oldest first. A failed removal is logged and skipped:
/// the deficit is left untouched and the file is not tried again.
pub fn evict(candidates: &[Candidate], deficit: Deficit) -> EvictionReport {
    let mut report = EvictionReport { remaining: deficit, ..Default::default() };

    for candidate in candidates {
        if report.remaining.is_cleared() { break; }

        if let Err(source) = fs::remove_file(&candidate.path) {
            let err = CleanError::Delete { path: candidate.path.clone(), source };
            warn!("{err}");
            report.failed.push(Failure { path: candidate.path.clone(), message: err.to_string() });
            continue;
        }

        report.remaining.relieve(candidate.blocks);
        report.blocks_freed = report.blocks_freed.saturating_add(candidate.blocks);
        report.bytes_freed  = report.bytes_freed.saturating_add(candidate.size);
        debug!(
            path = %candidate.path.display(),
            blocks = candidate.blocks,
            need_blocks = report.remaining.blocks,
            need_files = report.remaining.inodes,
            "deleted"
        );
        report.deleted.push(candidate.clone());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::walk::collect_candidates;
    use crate::models::candidate::sort_oldest_first;
    use crate::models::filesystem::FsSnapshot;
    use std::fs::File;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    const SNAP: FsSnapshot = FsSnapshot {
        total_blocks: 100,
        avail_blocks: 10,
        block_size:   1024,
        total_inodes: 100,
        avail_inodes: 50,
    };

    /// Write `size` bytes to `dir/name` and set its mtime to `age_secs` after a fixed epoch.
    fn make(dir: &Path, name: &str, size: usize, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, vec![b'x'; size]).unwrap();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + age_secs);
        File::options().write(true).open(&path).unwrap().set_modified(mtime).unwrap();
        path
    }

    fn plan(dir: &Path) -> Vec<Candidate> {
        let mut v = collect_candidates(dir, &SNAP).unwrap();
        sort_oldest_first(&mut v);
        v
    }

    fn names(v: &[Candidate]) -> Vec<String> {
        v.iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn worked_example_deletes_all_three_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        make(dir.path(), "c.dat", 10240, 300);
        make(dir.path(), "a.dat", 2048, 100);
        make(dir.path(), "b.dat", 512, 200);

        let report = evict(&plan(dir.path()), Deficit { blocks: 15, inodes: -25 });

        assert_eq!(names(&report.deleted), ["a.dat", "b.dat", "c.dat"]);
        assert_eq!(report.blocks_freed, 15);
        assert_eq!(report.bytes_freed, 2048 + 512 + 10240);
        assert_eq!(report.remaining, Deficit { blocks: 0, inodes: -28 });
        assert!(report.satisfied());
        assert!(report.failed.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stops_once_both_counters_clear() {
        let dir = tempfile::tempdir().unwrap();
        make(dir.path(), "old", 4096, 1);
        make(dir.path(), "mid", 0, 2);
        let newest = make(dir.path(), "new", 0, 3);

        // "old" covers the blocks (5) but one more inode is still owed after it.
        let report = evict(&plan(dir.path()), Deficit { blocks: 5, inodes: 2 });

        assert_eq!(names(&report.deleted), ["old", "mid"]);
        assert_eq!(report.remaining, Deficit { blocks: -1, inodes: 0 });
        assert!(newest.exists());
    }

    #[test]
    fn keeps_going_while_only_inodes_are_short() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            make(dir.path(), &format!("f{i}"), 0, i);
        }

        let report = evict(&plan(dir.path()), Deficit { blocks: -100, inodes: 3 });

        assert_eq!(names(&report.deleted), ["f0", "f1", "f2"]);
        assert!(dir.path().join("f3").exists());
    }

    #[test]
    fn cleared_deficit_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let only = make(dir.path(), "only", 10, 0);

        let report = evict(&plan(dir.path()), Deficit { blocks: 0, inodes: 0 });

        assert!(report.deleted.is_empty());
        assert!(only.exists());
    }

    #[test]
    fn failed_deletion_is_skipped_without_credit() {
        let dir = tempfile::tempdir().unwrap();
        let gone = make(dir.path(), "gone", 2048, 1);
        make(dir.path(), "next", 0, 2);
        make(dir.path(), "last", 0, 3);
        let candidates = plan(dir.path());
        fs::remove_file(&gone).unwrap();

        let report = evict(&candidates, Deficit { blocks: 1, inodes: 1 });

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, gone);
        assert!(report.failed[0].message.starts_with("Cleaning: "));
        // "gone" earned nothing, so "next" alone clears the deficit.
        assert_eq!(names(&report.deleted), ["next"]);
        assert_eq!(report.remaining, Deficit { blocks: 0, inodes: 0 });
        assert!(dir.path().join("last").exists());
    }

    #[test]
    fn exhausted_candidates_leave_a_positive_deficit() {
        let dir = tempfile::tempdir().unwrap();
        make(dir.path(), "sub/one", 100, 1);
        make(dir.path(), "two", 100, 2);

        let report = evict(&plan(dir.path()), Deficit { blocks: 50, inodes: 0 });

        assert_eq!(names(&report.deleted), ["one", "two"]);
        assert_eq!(report.remaining.blocks, 48);
        assert!(!report.satisfied());
        // Directories are never removed.
        assert!(dir.path().join("sub").is_dir());
    }

    #[test]
    fn deletion_follows_mtime_not_walk_order() {
        let dir = tempfile::tempdir().unwrap();
        make(dir.path(), "z/deep/first", 0, 10);
        make(dir.path(), "a", 0, 40);
        make(dir.path(), "m/second", 0, 20);
        make(dir.path(), "third", 0, 30);

        let report = evict(&plan(dir.path()), Deficit { blocks: 0, inodes: 4 });

        assert_eq!(names(&report.deleted), ["first", "second", "third", "a"]);
    }
}
