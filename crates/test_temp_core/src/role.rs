//! Resource roles and the markers that request them.
//!
//! A [`Role`] decides where a temporary resource lives inside the invocation
//! root and how it is named. Requests never name a role directly; they carry
//! a [`Marker`], and the marker table maps each marker to exactly one role.
//!
//! # Layout
//!
//! | Role | Marker | Base directory | Example |
//! |------|--------|----------------|---------|
//! | [`Role::Default`] | `#[temp_file]` | (root) | `file_1.tmp` |
//! | [`Role::Input`] | `#[temp_input_file]` | `input/0` | `input/0/input_1.tmp` |
//! | [`Role::InputDirectory`] | `#[temp_input_directory]` | `input` | `input/directory_1` |
//! | [`Role::Output`] | `#[temp_output_file]` | `output/0` | `output/0/output_1.tmp` |
//! | [`Role::OutputDirectory`] | `#[temp_output_directory]` | `output` | `output/directory_1` |

use core::fmt;

/// Classification of a requested temporary resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// A generic temporary file directly under the invocation root.
    Default,
    /// A file the test prepares as input for the code under test.
    Input,
    /// A directory the test prepares as input for the code under test.
    InputDirectory,
    /// A file the code under test writes.
    Output,
    /// A directory the code under test writes into.
    OutputDirectory,
}

impl Role {
    /// Number of roles.
    pub const COUNT: usize = 5;

    /// Every role, in declaration order.
    pub const ALL: [Role; Self::COUNT] = [
        Role::Default,
        Role::Input,
        Role::InputDirectory,
        Role::Output,
        Role::OutputDirectory,
    ];

    /// Dense index of this role, usable for per-role arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for roles that name files, `false` for directory roles.
    #[must_use]
    pub const fn is_file_role(self) -> bool {
        match self {
            Role::Default | Role::Input | Role::Output => true,
            Role::InputDirectory | Role::OutputDirectory => false,
        }
    }

    /// Path components of the role's base directory, relative to the
    /// invocation root. Empty for [`Role::Default`].
    #[must_use]
    pub const fn base_components(self) -> &'static [&'static str] {
        match self {
            Role::Default => &[],
            Role::Input => &["input", "0"],
            Role::InputDirectory => &["input"],
            Role::Output => &["output", "0"],
            Role::OutputDirectory => &["output"],
        }
    }

    /// Leaf name stem of generated entries, e.g. `input` in `input_3.tmp`.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Role::Default => "file",
            Role::Input => "input",
            Role::Output => "output",
            Role::InputDirectory | Role::OutputDirectory => "directory",
        }
    }

    /// Name prefix relative to the role's top-level directory
    /// (`file`, `input`, `input/directory`, `output`, `output/directory`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Role::Default => "file",
            Role::Input => "input",
            Role::InputDirectory => "input/directory",
            Role::Output => "output",
            Role::OutputDirectory => "output/directory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Default => "default",
            Role::Input => "input",
            Role::InputDirectory => "input directory",
            Role::Output => "output",
            Role::OutputDirectory => "output directory",
        };
        f.write_str(name)
    }
}

/// A capability marker attached to a resource request.
///
/// Markers are what a test author writes (`#[temp_input_file]` and friends);
/// the manager maps them to a [`Role`] through [`MARKER_ROLES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `#[temp_file]`
    TempFile,
    /// `#[temp_input_file]`
    TempInputFile,
    /// `#[temp_input_directory]`
    TempInputDirectory,
    /// `#[temp_output_file]`
    TempOutputFile,
    /// `#[temp_output_directory]`
    TempOutputDirectory,
}

/// Lookup table from marker to the role it requests.
pub const MARKER_ROLES: [(Marker, Role); Role::COUNT] = [
    (Marker::TempFile, Role::Default),
    (Marker::TempInputFile, Role::Input),
    (Marker::TempInputDirectory, Role::InputDirectory),
    (Marker::TempOutputFile, Role::Output),
    (Marker::TempOutputDirectory, Role::OutputDirectory),
];

impl Marker {
    /// The role this marker requests.
    #[must_use]
    pub const fn role(self) -> Role {
        // Table rows follow the declaration order of `Marker`.
        MARKER_ROLES[self as usize].1
    }

    /// The attribute spelling used on test parameters.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Marker::TempFile => "temp_file",
            Marker::TempInputFile => "temp_input_file",
            Marker::TempInputDirectory => "temp_input_directory",
            Marker::TempOutputFile => "temp_output_file",
            Marker::TempOutputDirectory => "temp_output_directory",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.attribute())
    }
}
