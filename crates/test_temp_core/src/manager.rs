//! The resource lifecycle manager.
//!
//! [`TempFileManager`] ties the pieces together. For every request it
//! resolves the role, allocates a path through [`PathAllocator`] against the
//! invocation's [`ResourceStore`], ensures the role's base directory exists,
//! creates directory resources eagerly when the class asks for it, and hands
//! the path back in the requested shape. At teardown it removes the
//! invocation root with [`delete_all`].
//!
//! # Invocation lifecycle
//!
//! ```text
//! NotStarted ──provide──▶ Active ──teardown──▶ TornDown
//! ```
//!
//! The first `provide` for an [`InvocationId`] creates its store; `teardown`
//! drops the store and deletes the root. Each invocation owns a distinct
//! root, `<storage root>/<invocation id>`, so tests running in parallel never
//! share a tree.

use crate::allocator::PathAllocator;
use crate::config::{RoleConfig, TestClass};
use crate::delete::delete_all;
use crate::error::TempError;
use crate::request::{OutputShape, Provided, ResourceRequest};
use crate::role::{Marker, Role};
use crate::settings::Settings;
use crate::store::ResourceStore;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

// ─────────────────────────────────────────────────────────────────────────────
// InvocationId
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of one test invocation; doubles as its root directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationId(String);

impl InvocationId {
    /// Builds an identifier from a test path such as `my_crate::io::reads`.
    ///
    /// `::` becomes `-`. Letters and digits (Unicode included) and `._-` are
    /// kept; anything else becomes `_`. Whenever a character is replaced, a
    /// hash of the full name is appended, so names that differ only in
    /// replaced characters still get distinct roots.
    #[must_use]
    pub fn from_test_name(name: &str) -> Self {
        let mut replaced = false;
        let mut sanitized: String = name
            .replace("::", "-")
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    replaced = true;
                    '_'
                }
            })
            .collect();

        // Keep the component from being empty or a relative-path alias.
        if sanitized.trim_matches('.').is_empty() {
            sanitized = "invocation".to_string();
            replaced = !name.is_empty();
        }

        if replaced {
            sanitized = format!("{sanitized}-{:08x}", name_hash(name));
        }
        Self(sanitized)
    }

    /// Identifier for the calling thread.
    ///
    /// Uses the thread name, which the standard test harness sets to the
    /// test's path. Unnamed threads get a process-unique fallback.
    #[must_use]
    pub fn current() -> Self {
        static UNNAMED: AtomicUsize = AtomicUsize::new(0);

        match std::thread::current().name() {
            Some(name) if name != "main" => Self::from_test_name(name),
            _ => {
                let n = UNNAMED.fetch_add(1, Ordering::Relaxed);
                Self(format!("invocation-{}-{n}", std::process::id()))
            }
        }
    }

    /// The identifier as a directory name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 32-bit FNV-1a over the UTF-8 bytes of `name`; stable across runs.
fn name_hash(name: &str) -> u32 {
    name.bytes().fold(0x811c_9dc5, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation
// ─────────────────────────────────────────────────────────────────────────────

/// Context of one running test: who it is and how its class is configured.
#[derive(Debug, Clone)]
pub struct Invocation {
    id: InvocationId,
    test_class: &'static str,
    config: RoleConfig,
}

impl Invocation {
    /// Creates an invocation with an explicit configuration.
    #[must_use]
    pub fn new(id: InvocationId, config: RoleConfig) -> Self {
        Self {
            id,
            test_class: "default",
            config,
        }
    }

    /// Creates an invocation of a test declared in class `C`.
    #[must_use]
    pub fn of_class<C: TestClass>(id: InvocationId) -> Self {
        Self {
            id,
            test_class: C::class_name(),
            config: C::role_config(),
        }
    }

    /// The invocation identifier.
    #[must_use]
    pub fn id(&self) -> &InvocationId {
        &self.id
    }

    /// Name of the enclosing test class.
    #[must_use]
    pub fn test_class(&self) -> &'static str {
        self.test_class
    }

    /// The enclosing class's configuration.
    #[must_use]
    pub fn config(&self) -> &RoleConfig {
        &self.config
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TempFileManager
// ─────────────────────────────────────────────────────────────────────────────

/// Allocates, tracks and cleans up temporary resources per invocation.
///
/// # Example
///
/// ```
/// use test_temp_core::{
///     Invocation, InvocationId, Marker, OutputShape, ResourceRequest, RoleConfig, Settings,
///     TempFileManager,
/// };
///
/// # let scratch = std::env::temp_dir().join("test_temp_doc_manager");
/// let manager = TempFileManager::new(Settings::new().with_storage_root(&scratch));
/// let invocation = Invocation::new(InvocationId::from_test_name("docs::example"), RoleConfig::new());
///
/// let request = ResourceRequest::new("input", OutputShape::Path).with_marker(Marker::TempInputFile);
/// let provided = manager.provide(&request, &invocation)?;
/// assert!(provided.as_path().ends_with("input/0/input_1.tmp"));
///
/// manager.teardown(&invocation)?;
/// assert!(!manager.invocation_root(&invocation).exists());
/// # Ok::<(), test_temp_core::TempError>(())
/// ```
#[derive(Debug)]
pub struct TempFileManager {
    settings: Settings,
    /// Stores of the active invocations.
    invocations: Mutex<HashMap<InvocationId, Arc<ResourceStore>>>,
}

impl Default for TempFileManager {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl TempFileManager {
    /// Creates a manager with the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            invocations: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide manager, configured from the environment on first use.
    pub fn global() -> &'static TempFileManager {
        static GLOBAL: OnceLock<TempFileManager> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let manager = TempFileManager::new(Settings::from_env());
            tracing::debug!(
                storage_root = %manager.settings.storage_root().display(),
                "temp file manager initialized"
            );
            manager
        })
    }

    /// The manager's settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Root directory of `invocation`. Exists only while resources are live.
    #[must_use]
    pub fn invocation_root(&self, invocation: &Invocation) -> PathBuf {
        self.settings
            .storage_root()
            .join(invocation.id().as_str())
    }

    /// Classifies a request by the marker attached to it.
    ///
    /// Repeating the same marker is harmless; two different markers are not.
    ///
    /// # Errors
    ///
    /// [`TempError::MissingMarker`] or [`TempError::ConflictingMarkers`].
    pub fn resolve_role(request: &ResourceRequest) -> Result<Role, TempError> {
        let mut distinct: Vec<Marker> = Vec::with_capacity(1);
        for &marker in request.markers() {
            if !distinct.contains(&marker) {
                distinct.push(marker);
            }
        }

        match distinct.as_slice() {
            [] => Err(TempError::MissingMarker {
                request: request.name().to_string(),
            }),
            [marker] => Ok(marker.role()),
            _ => Err(TempError::ConflictingMarkers {
                request: request.name().to_string(),
                markers: distinct,
            }),
        }
    }

    /// Provides a fresh resource for `request` within `invocation`.
    ///
    /// Usage errors are detected before anything is allocated or created.
    /// Plain files are never created; directory resources are created only
    /// when the invocation's class configures eager creation for their role.
    ///
    /// # Errors
    ///
    /// Usage errors for a missing or conflicting marker or an unsupported
    /// shape. [`TempError::NonUtf8Path`] when a `String` is requested below a
    /// non-UTF-8 storage root. [`TempError::CreateDirectory`] when the base or
    /// resource directory cannot be created.
    pub fn provide(
        &self,
        request: &ResourceRequest,
        invocation: &Invocation,
    ) -> Result<Provided, TempError> {
        let role = Self::resolve_role(request)?;
        if !request.shape().is_supported() {
            return Err(TempError::UnsupportedShape {
                request: request.name().to_string(),
                type_name: request.shape().type_name(),
            });
        }

        let root = self.invocation_root(invocation);
        // Generated names are UTF-8, so only the root can lack a string form.
        if request.shape() == OutputShape::String && root.to_str().is_none() {
            tracing::warn!(
                request = request.name(),
                root = %root.display(),
                "temp root is not valid UTF-8"
            );
            return Err(TempError::NonUtf8Path { path: root });
        }

        let store = self.store(invocation.id());
        let allocator = PathAllocator::new(root);
        let config = invocation.config();
        let path = allocator.allocate(role, &store, config);

        ensure_directory(&allocator.base_dir(role))?;

        if !role.is_file_role() && config.eager_create_for(role) {
            ensure_directory(&path)?;
            tracing::debug!(path = %path.display(), %role, "created temp directory eagerly");
        }

        tracing::debug!(
            invocation = %invocation.id(),
            class = invocation.test_class(),
            request = request.name(),
            %role,
            path = %path.display(),
            "provided temp resource"
        );

        Provided::convert(path, request)
    }

    /// Deletes the invocation root and forgets the invocation's store.
    ///
    /// An absent root is not an error: an invocation that never allocated
    /// anything tears down without touching the filesystem.
    ///
    /// # Errors
    ///
    /// [`TempError::Delete`] for the first entry that could not be removed.
    pub fn teardown(&self, invocation: &Invocation) -> Result<(), TempError> {
        let store = self.invocations.lock().remove(invocation.id());
        let root = self.invocation_root(invocation);

        match delete_all(&root) {
            Ok(()) => {
                tracing::debug!(
                    invocation = %invocation.id(),
                    allocated = store.is_some(),
                    root = %root.display(),
                    "temp resources torn down"
                );
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    invocation = %invocation.id(),
                    root = %root.display(),
                    error = %err,
                    "temp resource cleanup failed"
                );
                Err(err)
            }
        }
    }

    /// Whether `invocation` has allocated resources that are not torn down.
    #[must_use]
    pub fn is_active(&self, invocation: &Invocation) -> bool {
        self.invocations.lock().contains_key(invocation.id())
    }

    /// Paths allocated for `role` in `invocation`, in allocation order.
    #[must_use]
    pub fn allocated(&self, invocation: &Invocation, role: Role) -> Vec<PathBuf> {
        self.invocations
            .lock()
            .get(invocation.id())
            .map(|store| store.snapshot(role))
            .unwrap_or_default()
    }

    /// The invocation's store, created on first use.
    fn store(&self, id: &InvocationId) -> Arc<ResourceStore> {
        let mut invocations = self.invocations.lock();
        if let Some(store) = invocations.get(id) {
            return Arc::clone(store);
        }
        tracing::trace!(invocation = %id, "invocation started");
        let store = Arc::new(ResourceStore::new());
        invocations.insert(id.clone(), Arc::clone(&store));
        store
    }
}

/// Creates `path` and its parents; already existing is fine.
fn ensure_directory(path: &Path) -> Result<(), TempError> {
    fs::create_dir_all(path).map_err(|err| {
        tracing::warn!(path = %path.display(), error = %err, "cannot create temp directory");
        TempError::create_directory(path, err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(marker: Marker) -> ResourceRequest {
        ResourceRequest::new("param", OutputShape::Path).with_marker(marker)
    }

    #[test]
    fn plain_test_paths_map_one_to_one() {
        let id = InvocationId::from_test_name("my_crate::io::reads");
        assert_eq!(id.as_str(), "my_crate-io-reads");
    }

    #[test]
    fn replaced_characters_add_a_hash() {
        let id = InvocationId::from_test_name("my_crate::io::reads <generic>");
        let hash = format!("{:08x}", name_hash("my_crate::io::reads <generic>"));
        assert_eq!(id.as_str(), format!("my_crate-io-reads__generic_-{hash}"));
    }

    #[test]
    fn unicode_identifiers_are_kept() {
        let accented = InvocationId::from_test_name("m::t\u{eb}st");
        assert_eq!(accented.as_str(), "m-t\u{eb}st");
        assert_ne!(accented, InvocationId::from_test_name("m::t\u{e9}st"));
    }

    #[test]
    fn names_differing_only_in_replaced_characters_stay_distinct() {
        let spaced = InvocationId::from_test_name("m::case one");
        let angled = InvocationId::from_test_name("m::case<one");
        assert!(spaced.as_str().starts_with("m-case_one-"));
        assert!(angled.as_str().starts_with("m-case_one-"));
        assert_ne!(spaced, angled);
    }

    #[test]
    fn dot_only_names_are_replaced() {
        assert_ne!(InvocationId::from_test_name("..").as_str(), "..");
        assert_ne!(
            InvocationId::from_test_name(".."),
            InvocationId::from_test_name(".")
        );
        assert_eq!(InvocationId::from_test_name("").as_str(), "invocation");
    }

    #[test]
    fn current_uses_the_thread_name() {
        let id = std::thread::Builder::new()
            .name("suite::case".to_string())
            .spawn(InvocationId::current)
            .expect("spawn named thread")
            .join()
            .expect("Thread panicked");
        assert_eq!(id.as_str(), "suite-case");
    }

    #[test]
    fn unnamed_threads_get_unique_fallbacks() {
        let first = std::thread::spawn(InvocationId::current)
            .join()
            .expect("Thread panicked");
        let second = std::thread::spawn(InvocationId::current)
            .join()
            .expect("Thread panicked");

        let prefix = format!("invocation-{}-", std::process::id());
        assert!(first.as_str().starts_with(&prefix), "{first}");
        assert!(second.as_str().starts_with(&prefix), "{second}");
        assert_ne!(first, second);
    }

    #[test]
    fn current_matches_the_harness_test_name() {
        let name = std::thread::current().name().map(str::to_owned);
        if let Some(name) = name.filter(|name| name != "main") {
            assert_eq!(InvocationId::current(), InvocationId::from_test_name(&name));
        }
    }

    #[test]
    fn resolves_each_marker() {
        for (marker, role) in crate::role::MARKER_ROLES {
            assert_eq!(TempFileManager::resolve_role(&request(marker)).unwrap(), role);
        }
    }

    #[test]
    fn missing_marker_is_usage_error() {
        let err =
            TempFileManager::resolve_role(&ResourceRequest::new("p", OutputShape::Path)).unwrap_err();
        assert!(matches!(err, TempError::MissingMarker { .. }));
    }

    #[test]
    fn conflicting_markers_are_usage_error() {
        let request = request(Marker::TempInputFile).with_marker(Marker::TempOutputFile);
        let err = TempFileManager::resolve_role(&request).unwrap_err();

        match err {
            TempError::ConflictingMarkers { markers, .. } => {
                assert_eq!(markers, vec![Marker::TempInputFile, Marker::TempOutputFile]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_marker_is_not_a_conflict() {
        let request = request(Marker::TempFile).with_marker(Marker::TempFile);
        assert_eq!(TempFileManager::resolve_role(&request).unwrap(), Role::Default);
    }

    #[test]
    fn invocation_root_is_namespaced_by_id() {
        let manager = TempFileManager::new(Settings::new().with_storage_root("/scratch"));
        let invocation = Invocation::new(InvocationId::from_test_name("a::b"), RoleConfig::new());

        assert_eq!(
            manager.invocation_root(&invocation),
            Path::new("/scratch").join("a-b")
        );
    }
}
