//! Errors raised while providing or tearing down temporary resources.

use crate::role::Marker;
use std::io;
use std::path::{Path, PathBuf};

/// Broad classification of a [`TempError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the manager cannot provide.
    Usage,
    /// The filesystem refused an operation.
    Environment,
}

/// Errors that can occur while providing or cleaning up temporary resources.
#[derive(Debug, thiserror::Error)]
pub enum TempError {
    /// The request carries none of the five temp resource markers.
    #[error("parameter `{request}` carries no temp resource marker")]
    MissingMarker {
        /// Name of the offending request.
        request: String,
    },

    /// The request carries more than one distinct temp resource marker.
    #[error("parameter `{request}` carries conflicting temp resource markers: {markers:?}")]
    ConflictingMarkers {
        /// Name of the offending request.
        request: String,
        /// The distinct markers found on the request.
        markers: Vec<Marker>,
    },

    /// The request asks for a value shape the manager cannot produce.
    #[error(
        "parameter `{request}` has unsupported type `{type_name}` (expected `TempPath`, `PathBuf` or `String`)"
    )]
    UnsupportedShape {
        /// Name of the offending request.
        request: String,
        /// The declared type that has no conversion.
        type_name: &'static str,
    },

    /// A base or resource directory could not be created.
    #[error("failed to create temp directory {}", .path.display())]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A path requested as a `String` is not valid UTF-8.
    #[error("temp path {} is not valid UTF-8 and cannot be provided as a string", .path.display())]
    NonUtf8Path {
        /// The path that has no exact string form.
        path: PathBuf,
    },

    /// An entry of the temporary tree could not be removed.
    #[error("failed to delete temp entry {}", .path.display())]
    Delete {
        /// Entry that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl TempError {
    pub(crate) fn create_directory(path: &Path, source: io::Error) -> Self {
        Self::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn delete(path: &Path, source: io::Error) -> Self {
        Self::Delete {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns whether this is a usage or an environment error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingMarker { .. }
            | Self::ConflictingMarkers { .. }
            | Self::UnsupportedShape { .. } => ErrorKind::Usage,
            Self::CreateDirectory { .. } | Self::NonUtf8Path { .. } | Self::Delete { .. } => {
                ErrorKind::Environment
            }
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Usage`.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        self.kind() == ErrorKind::Usage
    }

    /// The filesystem path involved, for environment errors.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CreateDirectory { path, .. }
            | Self::NonUtf8Path { path }
            | Self::Delete { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_are_classified() {
        let err = TempError::MissingMarker {
            request: "file".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.path().is_none());
    }

    #[test]
    fn environment_errors_carry_path() {
        let err = TempError::delete(
            Path::new("target/test-temp/x"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert_eq!(err.path(), Some(Path::new("target/test-temp/x")));
        assert!(err.to_string().contains("target/test-temp/x"));
    }

    #[test]
    fn non_utf8_paths_are_environment_errors() {
        let err = TempError::NonUtf8Path {
            path: PathBuf::from("root/file_1.tmp"),
        };
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert_eq!(err.path(), Some(Path::new("root/file_1.tmp")));
    }

    #[test]
    fn conflicting_markers_message_lists_markers() {
        let err = TempError::ConflictingMarkers {
            request: "dir".into(),
            markers: vec![Marker::TempInputFile, Marker::TempOutputFile],
        };
        let message = err.to_string();
        assert!(message.contains("TempInputFile"));
        assert!(message.contains("TempOutputFile"));
    }
}
