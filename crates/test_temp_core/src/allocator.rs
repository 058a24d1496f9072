//! Collision-free path allocation.
//!
//! Names follow `<stem>_<i><suffix>` inside the role's base directory, with
//! `i` searched upward from 1 until the candidate is absent from the tracked
//! set. Searching instead of counting keeps allocation correct when the tracked
//! set is sparse, e.g. when an entry was reserved out of order.
//!
//! Nothing here touches the filesystem.

use crate::config::RoleConfig;
use crate::role::Role;
use crate::store::ResourceStore;
use std::path::{Path, PathBuf};

/// Derives fresh paths below one invocation root.
#[derive(Debug, Clone)]
pub struct PathAllocator {
    root: PathBuf,
}

impl PathAllocator {
    /// Creates an allocator for the given invocation root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The invocation root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base directory of `role` below the invocation root.
    #[must_use]
    pub fn base_dir(&self, role: Role) -> PathBuf {
        role.base_components()
            .iter()
            .fold(self.root.clone(), |dir, component| dir.join(component))
    }

    /// The candidate path for index `index`.
    #[must_use]
    pub fn candidate(&self, role: Role, index: usize, extension: &str) -> PathBuf {
        let name = if role.is_file_role() {
            format!("{}_{index}.{extension}", role.stem())
        } else {
            format!("{}_{index}", role.stem())
        };
        self.base_dir(role).join(name)
    }

    /// First candidate, probing from index 1, that is not in `tracked`.
    ///
    /// Terminates for every finite `tracked`: each index yields a distinct name.
    #[must_use]
    pub fn next_free(&self, role: Role, tracked: &[PathBuf], extension: &str) -> PathBuf {
        let mut index = 1;
        loop {
            let candidate = self.candidate(role, index, extension);
            if !tracked.contains(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }

    /// Allocates the next path for `role` and records it in `store`.
    ///
    /// The extension comes from `config`; probing and recording happen under
    /// the store's per-role lock.
    pub fn allocate(&self, role: Role, store: &ResourceStore, config: &RoleConfig) -> PathBuf {
        let extension = config.extension_for(role);
        store.with_tracked(role, |tracked| {
            let path = self.next_free(role, tracked, extension);
            tracked.push(path.clone());
            path
        })
    }
}
