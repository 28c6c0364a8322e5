use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a cleaning run, prefixed with the phase they happened in.
///
/// `Statfs`, `Walk` and `Metadata` abort the run. `Delete` only affects one file.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Getting fs size: {path}: {source}")]
    Statfs {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },

    #[error("Walking: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Walking: {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cleaning: {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
