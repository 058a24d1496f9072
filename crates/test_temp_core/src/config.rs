//! Per-test-class configuration of temporary resources.
//!
//! This module provides:
//!
//! - [`RoleConfig`] - The four optional class-level markers and the lookups
//!   the manager performs on every request.
//!
//! - [`TestClass`] - Trait tying a test class type to its [`RoleConfig`].
//!   Usually derived.
//!
//! # Derive Macro
//!
//! `#[derive(TestClass)]` implements [`TestClass`] from `#[temp(...)]` markers:
//!
//! ```
//! use test_temp_core::{Role, TestClass};
//!
//! #[derive(TestClass)]
//! #[temp(input_files(extension = "txt"), output_directories(create = true))]
//! struct ReportTests;
//!
//! let config = ReportTests::role_config();
//! assert_eq!(config.extension_for(Role::Input), "txt");
//! assert_eq!(config.extension_for(Role::Output), "tmp");
//! assert!(config.eager_create_for(Role::OutputDirectory));
//! ```

use crate::role::Role;

// Re-export the derive macro.
pub use test_temp_macros::TestClass;

/// Extension used for file roles when no marker overrides it.
pub const DEFAULT_EXTENSION: &str = "tmp";

/// Class-level marker configuring a file role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesMarker {
    /// File name extension, without the leading dot.
    pub extension: String,
}

/// Class-level marker configuring a directory role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoriesMarker {
    /// Whether allocated directories are created on the spot.
    pub create: bool,
}

/// Configuration markers declared on one test class.
///
/// Every marker is optional. An absent marker yields the defaults
/// (`"tmp"` extension, no eager creation); a present marker overrides the
/// fields it declares. The value is cheap to clone and carries no state
/// between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleConfig {
    input_files: Option<FilesMarker>,
    output_files: Option<FilesMarker>,
    input_directories: Option<DirectoriesMarker>,
    output_directories: Option<DirectoriesMarker>,
}

impl RoleConfig {
    /// Creates a configuration with no markers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the extension of [`Role::Input`] files.
    #[must_use]
    pub fn with_input_files(mut self, extension: impl Into<String>) -> Self {
        self.input_files = Some(FilesMarker {
            extension: extension.into(),
        });
        self
    }

    /// Declares the extension of [`Role::Output`] files.
    #[must_use]
    pub fn with_output_files(mut self, extension: impl Into<String>) -> Self {
        self.output_files = Some(FilesMarker {
            extension: extension.into(),
        });
        self
    }

    /// Declares whether [`Role::InputDirectory`] entries are created eagerly.
    #[must_use]
    pub fn with_input_directories(mut self, create: bool) -> Self {
        self.input_directories = Some(DirectoriesMarker { create });
        self
    }

    /// Declares whether [`Role::OutputDirectory`] entries are created eagerly.
    #[must_use]
    pub fn with_output_directories(mut self, create: bool) -> Self {
        self.output_directories = Some(DirectoriesMarker { create });
        self
    }

    /// The marker scoped to a file role, if declared.
    #[must_use]
    pub fn files_marker(&self, role: Role) -> Option<&FilesMarker> {
        match role {
            Role::Input => self.input_files.as_ref(),
            Role::Output => self.output_files.as_ref(),
            Role::Default | Role::InputDirectory | Role::OutputDirectory => None,
        }
    }

    /// The marker scoped to a directory role, if declared.
    #[must_use]
    pub fn directories_marker(&self, role: Role) -> Option<DirectoriesMarker> {
        match role {
            Role::InputDirectory => self.input_directories,
            Role::OutputDirectory => self.output_directories,
            Role::Default | Role::Input | Role::Output => None,
        }
    }

    /// File name extension for `role`.
    ///
    /// [`Role::Default`] always uses [`DEFAULT_EXTENSION`]. Directory roles
    /// have no extension but report the default for uniformity.
    #[must_use]
    pub fn extension_for(&self, role: Role) -> &str {
        self.files_marker(role)
            .map_or(DEFAULT_EXTENSION, |marker| marker.extension.as_str())
    }

    /// Whether entries of `role` are created at allocation time.
    ///
    /// Always `false` for file roles.
    #[must_use]
    pub fn eager_create_for(&self, role: Role) -> bool {
        self.directories_marker(role)
            .is_some_and(|marker| marker.create)
    }
}

/// A test class: the unit that carries class-level temp resource markers.
///
/// Can be derived via `#[derive(TestClass)]`:
///
/// ```
/// use test_temp_core::TestClass;
///
/// #[derive(TestClass)]
/// #[temp(input_directories(create = true))]
/// struct FixtureTests;
///
/// assert!(FixtureTests::class_name().ends_with("FixtureTests"));
/// ```
pub trait TestClass: 'static {
    /// Human-readable class name, used in logs.
    fn class_name() -> &'static str {
        core::any::type_name::<Self>()
    }

    /// The class's configuration. Defaults to no markers.
    fn role_config() -> RoleConfig {
        RoleConfig::default()
    }
}

/// The class used when a test names none: no markers, all defaults.
pub struct DefaultClass;

impl TestClass for DefaultClass {
    fn class_name() -> &'static str {
        "default"
    }
}
