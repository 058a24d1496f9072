//! Per-invocation tracking of allocated paths.

use crate::role::Role;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Ordered, append-only record of every path allocated in one invocation.
///
/// Each role has its own lock, so allocations for different roles never
/// contend. Probing and appending for one role happen under a single lock
/// acquisition (see [`with_tracked`](Self::with_tracked)), which is what makes
/// parallel allocations collision-free.
#[derive(Debug, Default)]
pub struct ResourceStore {
    tracked: [Mutex<Vec<PathBuf>>; Role::COUNT],
}

impl ResourceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the sequence tracked for `role`.
    ///
    /// Callers must only append; entries are never removed individually.
    pub fn with_tracked<R>(&self, role: Role, f: impl FnOnce(&mut Vec<PathBuf>) -> R) -> R {
        let mut tracked = self.tracked[role.index()].lock();
        f(&mut tracked)
    }

    /// Snapshot of the paths allocated for `role`, in allocation order.
    #[must_use]
    pub fn snapshot(&self, role: Role) -> Vec<PathBuf> {
        self.tracked[role.index()].lock().clone()
    }

    /// Whether `path` has been allocated for `role`.
    #[must_use]
    pub fn contains(&self, role: Role, path: &Path) -> bool {
        self.tracked[role.index()]
            .lock()
            .iter()
            .any(|tracked| tracked == path)
    }

    /// Number of paths allocated for `role`.
    #[must_use]
    pub fn len(&self, role: Role) -> usize {
        self.tracked[role.index()].lock().len()
    }

    /// Whether nothing has been allocated for any role.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.iter().all(|tracked| tracked.lock().is_empty())
    }
}
