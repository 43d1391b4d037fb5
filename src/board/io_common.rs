// Primitives shared by the data sources.

use async_trait::async_trait;
use election_board::{FailureKind, SourceFailure, SourceOutcome};

/// Somewhere the data files can be read from.
///
/// Implementations never fail a whole cycle: every problem with a file comes
/// back as a tagged `SourceFailure` for that file only.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// A readable location for `path`, used in logs and failure reports.
    fn locate(&self, path: &str) -> String;

    /// Reads the raw bytes of `path`, relative to the data root.
    async fn fetch(&self, path: &str) -> SourceOutcome<Vec<u8>>;

    /// A readable location for the data root itself.
    fn root(&self) -> String;
}

pub fn failure(source: String, kind: FailureKind, message: impl ToString) -> SourceFailure {
    SourceFailure {
        source,
        kind,
        message: message.to_string(),
    }
}
