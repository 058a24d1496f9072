//! Resource requests and the values handed back to callers.
//!
//! A [`ResourceRequest`] describes one parameter a test wants filled: its
//! name, the [`Marker`]s attached to it and the [`OutputShape`] it declares.
//! The manager answers with a [`Provided`] value in that shape.

use crate::error::TempError;
use crate::role::Marker;
use core::fmt;
use core::ops::Deref;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// OutputShape
// ─────────────────────────────────────────────────────────────────────────────

/// The value shape a request declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// A [`TempPath`] handle.
    Handle,
    /// A [`PathBuf`].
    Path,
    /// A [`String`] form of the path.
    String,
    /// Any other declared type; always rejected as a usage error.
    Unsupported(&'static str),
}

impl OutputShape {
    /// Returns `true` for the three shapes the manager can produce.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, OutputShape::Unsupported(_))
    }

    /// Name of the declared type, for diagnostics.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            OutputShape::Handle => "TempPath",
            OutputShape::Path => "PathBuf",
            OutputShape::String => "String",
            OutputShape::Unsupported(name) => name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceRequest
// ─────────────────────────────────────────────────────────────────────────────

/// Descriptor of a single resource request.
///
/// # Example
///
/// ```
/// use test_temp_core::{Marker, OutputShape, ResourceRequest};
///
/// let request = ResourceRequest::new("report", OutputShape::Path)
///     .with_marker(Marker::TempOutputFile);
/// assert_eq!(request.markers(), &[Marker::TempOutputFile]);
/// ```
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    name: Cow<'static, str>,
    shape: OutputShape,
    markers: Vec<Marker>,
}

impl ResourceRequest {
    /// Creates a request with no markers attached.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, shape: OutputShape) -> Self {
        Self {
            name: name.into(),
            shape,
            markers: Vec::new(),
        }
    }

    /// Attaches a marker.
    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Parameter name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared output shape.
    #[must_use]
    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    /// Markers attached to the request, in attachment order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TempPath
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to an allocated temporary path.
///
/// The handle does not create anything on its own; [`create_file`](Self::create_file)
/// and [`create_dir_all`](Self::create_dir_all) are there for the test body.
/// Whatever it creates is removed with the rest of the invocation root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TempPath {
    path: PathBuf,
}

impl TempPath {
    /// Wraps an allocated path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The allocated path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything exists at the path yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Creates (or truncates) a file at the path.
    pub fn create_file(&self) -> io::Result<File> {
        File::create(&self.path)
    }

    /// Creates the path as a directory, including missing parents.
    pub fn create_dir_all(&self) -> io::Result<()> {
        fs::create_dir_all(&self.path)
    }

    /// Consumes the handle, returning the path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl Deref for TempPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TempPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path.display(), f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provided
// ─────────────────────────────────────────────────────────────────────────────

/// A provided resource in the shape its request declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provided {
    /// See [`OutputShape::Handle`].
    Handle(TempPath),
    /// See [`OutputShape::Path`].
    Path(PathBuf),
    /// See [`OutputShape::String`].
    String(String),
}

impl Provided {
    /// Converts an allocated path into the requested shape.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::UnsupportedShape`] for [`OutputShape::Unsupported`]
    /// and [`TempError::NonUtf8Path`] when a `String` cannot name `path` exactly.
    pub fn convert(path: PathBuf, request: &ResourceRequest) -> Result<Self, TempError> {
        match request.shape() {
            OutputShape::Handle => Ok(Provided::Handle(TempPath::new(path))),
            OutputShape::Path => Ok(Provided::Path(path)),
            OutputShape::String => path_into_string(path).map(Provided::String),
            OutputShape::Unsupported(type_name) => Err(TempError::UnsupportedShape {
                request: request.name().to_string(),
                type_name,
            }),
        }
    }

    /// The shape of this value.
    #[must_use]
    pub fn shape(&self) -> OutputShape {
        match self {
            Provided::Handle(_) => OutputShape::Handle,
            Provided::Path(_) => OutputShape::Path,
            Provided::String(_) => OutputShape::String,
        }
    }

    /// Borrows the value as a path, whatever its shape.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        match self {
            Provided::Handle(handle) => handle.path(),
            Provided::Path(path) => path,
            Provided::String(string) => Path::new(string),
        }
    }
}

/// Converts `path` into a `String` naming exactly the same location.
fn path_into_string(path: PathBuf) -> Result<String, TempError> {
    path.into_os_string()
        .into_string()
        .map_err(|raw| TempError::NonUtf8Path {
            path: PathBuf::from(raw),
        })
}

/// Types a test parameter may be declared as.
///
/// Implemented for [`TempPath`], [`PathBuf`] and [`String`]. Any other
/// parameter type is rejected when the `#[temp_test]` expansion is compiled.
pub trait FromProvided: Sized {
    /// The shape to request for this type.
    const SHAPE: OutputShape;

    /// Extracts the value, converting from another shape when necessary.
    ///
    /// # Errors
    ///
    /// [`TempError::NonUtf8Path`] when a non-UTF-8 path is converted to a
    /// `String`. Every other conversion is infallible.
    fn from_provided(provided: Provided) -> Result<Self, TempError>;
}

impl FromProvided for TempPath {
    const SHAPE: OutputShape = OutputShape::Handle;

    fn from_provided(provided: Provided) -> Result<Self, TempError> {
        Ok(match provided {
            Provided::Handle(handle) => handle,
            Provided::Path(path) => TempPath::new(path),
            Provided::String(string) => TempPath::new(string),
        })
    }
}

impl FromProvided for PathBuf {
    const SHAPE: OutputShape = OutputShape::Path;

    fn from_provided(provided: Provided) -> Result<Self, TempError> {
        Ok(match provided {
            Provided::Handle(handle) => handle.into_path_buf(),
            Provided::Path(path) => path,
            Provided::String(string) => PathBuf::from(string),
        })
    }
}

impl FromProvided for String {
    const SHAPE: OutputShape = OutputShape::String;

    fn from_provided(provided: Provided) -> Result<Self, TempError> {
        match provided {
            Provided::Handle(handle) => path_into_string(handle.into_path_buf()),
            Provided::Path(path) => path_into_string(path),
            Provided::String(string) => Ok(string),
        }
    }
}
