use serde::Serialize;

/// Summary of a single replica synchronization run. Ephemeral; returned to
/// the caller and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Upstream records inserted because they were absent locally.
    pub new_count: usize,
    /// Local records rewritten because name or price drifted.
    pub updated_count: usize,
    /// Replica size after the run.
    pub replica_size: usize,
}

impl SyncReport {
    /// A zero-change report against the current replica size. Used when the
    /// upstream fetch failed or returned nothing.
    pub fn unchanged(replica_size: usize) -> Self {
        Self {
            new_count: 0,
            updated_count: 0,
            replica_size,
        }
    }
}
