// Reading data files from a local directory.

use async_trait::async_trait;
use election_board::{FailureKind, SourceOutcome};
use std::io::ErrorKind;
use std::time::Duration;

use crate::board::io_common::{failure, DataSource};
use crate::board::*;

/// Serves the data files straight from disk. There is no cache to defeat,
/// so no cache busting happens here.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    timeout: Duration,
}

impl DirSource {
    pub fn new(root: PathBuf, timeout: Duration) -> DirSource {
        DirSource { root, timeout }
    }

    /// A missing data directory means the whole source is gone. Past that,
    /// a read error only concerns the one file.
    async fn classify(&self, e: &std::io::Error) -> FailureKind {
        match tokio::fs::metadata(&self.root).await {
            Ok(m) if m.is_dir() => match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => FailureKind::Missing,
                _ => FailureKind::Transport,
            },
            _ => FailureKind::Unreachable,
        }
    }
}

#[async_trait]
impl DataSource for DirSource {
    fn locate(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }

    async fn fetch(&self, path: &str) -> SourceOutcome<Vec<u8>> {
        let p = self.root.join(path);
        let loc = p.display().to_string();
        debug!("fetch: reading {}", loc);
        match tokio::time::timeout(self.timeout, tokio::fs::read(&p)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(failure(loc, self.classify(&e).await, e)),
            Err(_) => Err(failure(loc, FailureKind::Timeout, "read timed out")),
        }
    }

    fn root(&self) -> String {
        self.root.display().to_string()
    }
}
