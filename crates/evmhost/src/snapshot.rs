//! Snapshot discipline over the state backend checkpoints.
use context::{JournalCheckpoint, StateBackend};

/// A pending state checkpoint.
///
/// Must be resolved with [`Snapshot::commit`] or [`Snapshot::revert`] before the
/// enclosing snapshot is resolved. Both consume it, so a reverted snapshot can not
/// be reused.
#[derive(Debug)]
#[must_use = "a snapshot has to be committed or reverted"]
pub struct Snapshot {
    checkpoint: JournalCheckpoint,
}

impl Snapshot {
    /// Takes a checkpoint of `backend`.
    #[inline]
    pub fn acquire<B: StateBackend + ?Sized>(backend: &mut B) -> Self {
        Self {
            checkpoint: backend.snapshot(),
        }
    }

    /// Keeps every change made since the snapshot.
    #[inline]
    pub fn commit<B: StateBackend + ?Sized>(self, backend: &mut B) {
        backend.commit(self.checkpoint);
    }

    /// Undoes every change made since the snapshot.
    ///
    /// Access-list membership is not part of the backend and is not undone.
    #[inline]
    pub fn revert<B: StateBackend + ?Sized>(self, backend: &mut B) {
        backend.revert(self.checkpoint);
    }

    /// Reverts if `revert` is set, commits otherwise.
    #[inline]
    pub fn resolve<B: StateBackend + ?Sized>(self, backend: &mut B, revert: bool) {
        if revert {
            self.revert(backend);
        } else {
            self.commit(backend);
        }
    }
}
