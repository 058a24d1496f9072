//! Manager settings.
//!
//! The only setting that matters today is the storage root: the directory
//! under which every invocation root is created. It resolves in this order:
//!
//! 1. `TEST_TEMP_DIR`
//! 2. `<CARGO_TARGET_DIR>/test-temp`
//! 3. `<build dir>/test-temp`, where the build dir is the ancestor of the
//!    running test binary that cargo marked with `CACHEDIR.TAG`
//! 4. the relative `target/test-temp`
//!
//! Step 3 keeps workspace members on the shared build directory instead of
//! a `target/` next to their own manifest.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the storage root directly.
pub const STORAGE_ROOT_ENV: &str = "TEST_TEMP_DIR";

/// Environment variable cargo uses for a relocated build directory.
pub const TARGET_DIR_ENV: &str = "CARGO_TARGET_DIR";

/// Name of the storage root below the build directory.
pub const STORAGE_DIR_NAME: &str = "test-temp";

/// Build directory used when nothing else locates one.
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Marker file cargo writes at the top of every build directory.
const BUILD_DIR_TAG: &str = "CACHEDIR.TAG";

/// Settings for a [`TempFileManager`](crate::TempFileManager).
///
/// # Example
///
/// ```
/// use test_temp_core::Settings;
///
/// let settings = Settings::new().with_storage_root("/tmp/my-tests");
/// assert_eq!(settings.storage_root(), std::path::Path::new("/tmp/my-tests"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding every invocation root.
    storage_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_root: Path::new(DEFAULT_TARGET_DIR).join(STORAGE_DIR_NAME),
        }
    }
}

impl Settings {
    /// Creates settings with the built-in defaults, ignoring the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves settings from the process environment and the location of
    /// the running executable.
    #[must_use]
    pub fn from_env() -> Self {
        let exe = std::env::current_exe().ok();
        Self::resolve(|key| std::env::var_os(key), exe.as_deref())
    }

    /// Resolves settings through an arbitrary variable lookup.
    ///
    /// The executable location is not consulted.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        Self::resolve(lookup, None)
    }

    fn resolve(lookup: impl Fn(&str) -> Option<OsString>, exe: Option<&Path>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(root) = non_empty(STORAGE_ROOT_ENV) {
            return Self::new().with_storage_root(root);
        }

        let build_dir = non_empty(TARGET_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| exe.and_then(build_dir_of).map(Path::to_path_buf));

        match build_dir {
            Some(dir) => Self::new().with_storage_root(dir.join(STORAGE_DIR_NAME)),
            None => Self::default(),
        }
    }

    /// Sets the storage root.
    #[must_use]
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    /// The storage root.
    #[must_use]
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}

/// The cargo build directory containing `exe`, e.g. `target` for
/// `target/debug/deps/my_test-1a2b`.
fn build_dir_of(exe: &Path) -> Option<&Path> {
    exe.ancestors()
        .skip(1)
        .find(|dir| dir.join(BUILD_DIR_TAG).is_file())
}
