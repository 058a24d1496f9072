//! Per-test temporary files and directories.
//!
//! `test_temp_core` hands every test invocation its own directory tree,
//! names resources in it deterministically, and removes the whole tree when
//! the test ends:
//!
//! - [`role`] - The five resource roles and the markers requesting them
//! - [`request`] - Resource requests and the values handed back
//! - [`config`] - Class-level markers ([`RoleConfig`], [`TestClass`])
//! - [`allocator`] - Collision-free path allocation
//! - [`store`] - Per-invocation record of allocated paths
//! - [`delete`] - Bottom-up removal of a temporary tree
//! - [`manager`] - The lifecycle manager tying it together
//! - [`scope`] - RAII guard for one running test
//! - [`settings`] - Storage root configuration
//! - [`logging`] - Tracing subscriber for test binaries
//! - [`macro@temp_test`] - Attribute macro binding test parameters
//!
//! # Layout
//!
//! ```text
//! <storage root>/<invocation>/
//!   file_1.tmp, file_2.tmp, ...        #[temp_file]
//!   input/0/input_1.<ext>, ...         #[temp_input_file]
//!   input/directory_1, ...             #[temp_input_directory]
//!   output/0/output_1.<ext>, ...       #[temp_output_file]
//!   output/directory_1, ...            #[temp_output_directory]
//! ```
//!
//! # Example
//!
//! `#[temp_test]` emits a `#[test]` function, which only exists when the
//! crate is built by the test harness. The block below is therefore compiled
//! but not run here; the same test runs in the workspace's macro tests.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use test_temp_core::{TempPath, TestClass, temp_test};
//!
//! #[derive(TestClass)]
//! #[temp(input_files(extension = "csv"))]
//! struct ImportTests;
//!
//! #[temp_test(class = ImportTests)]
//! fn imports_rows(#[temp_input_file] source: PathBuf, #[temp_output_directory] out: TempPath) {
//!     std::fs::write(&source, "a,b\n1,2\n").unwrap();
//!     assert_eq!(source.extension().and_then(|ext| ext.to_str()), Some("csv"));
//!     assert!(!out.exists());
//! }
//! ```

// Self-reference so macro-generated `test_temp_core::` paths resolve inside this crate.
extern crate self as test_temp_core;

/// Collision-free path allocation.
pub mod allocator;

/// Class-level configuration markers.
pub mod config;

/// Recursive deletion of temporary trees.
pub mod delete;

/// Error types.
pub mod error;

/// Tracing setup for test binaries.
pub mod logging;

/// The resource lifecycle manager.
pub mod manager;

/// Resource requests and provided values.
pub mod request;

/// Resource roles and markers.
pub mod role;

/// Per-test RAII guard.
pub mod scope;

/// Manager settings.
pub mod settings;

/// Per-invocation path tracking.
pub mod store;

pub use allocator::PathAllocator;
pub use config::{DEFAULT_EXTENSION, DefaultClass, DirectoriesMarker, FilesMarker, RoleConfig, TestClass};
pub use delete::delete_all;
pub use error::{ErrorKind, TempError};
pub use manager::{Invocation, InvocationId, TempFileManager};
pub use request::{FromProvided, OutputShape, Provided, ResourceRequest, TempPath};
pub use role::{MARKER_ROLES, Marker, Role};
pub use scope::TestScope;
pub use settings::Settings;
pub use store::ResourceStore;

/// Re-export the `#[temp_test]` attribute macro.
pub use test_temp_macros::temp_test;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{DefaultClass, RoleConfig, TestClass};
    pub use crate::error::TempError;
    pub use crate::request::TempPath;
    pub use crate::role::{Marker, Role};
    pub use crate::scope::TestScope;
    pub use crate::temp_test;
}
