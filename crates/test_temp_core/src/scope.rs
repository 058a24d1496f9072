//! One running test, as seen by the manager.
//!
//! A [`TestScope`] is created when a test starts and torn down when it ends,
//! either explicitly through [`TestScope::finish`] or implicitly on drop. A
//! teardown failure on drop fails the test with a panic; when the test is
//! already panicking the failure is logged instead, because a second panic
//! would abort the whole test binary.
//!
//! `#[temp_test]` expands to this, using [`TestScope::begin`] on the
//! process-wide manager instead of an explicit one:
//!
//! ```
//! use std::path::PathBuf;
//! use test_temp_core::{
//!     DefaultClass, Invocation, InvocationId, Marker, Settings, TempFileManager, TestScope,
//! };
//!
//! # let scratch = std::env::temp_dir().join("test_temp_doc_scope");
//! let manager = TempFileManager::new(Settings::new().with_storage_root(&scratch));
//! let invocation = Invocation::of_class::<DefaultClass>(InvocationId::from_test_name("docs::scope"));
//!
//! let scope = TestScope::new(&manager, invocation);
//! let file: PathBuf = scope.provide_as("file", Marker::TempFile)?;
//! std::fs::write(&file, "payload").unwrap();
//!
//! scope.finish()?;
//! assert!(!file.exists());
//! # Ok::<(), test_temp_core::TempError>(())
//! ```

use crate::config::TestClass;
use crate::error::TempError;
use crate::logging;
use crate::manager::{Invocation, InvocationId, TempFileManager};
use crate::request::{FromProvided, Provided, ResourceRequest};
use crate::role::Marker;
use std::borrow::Cow;
use std::path::PathBuf;

/// Guard tying temporary resources to the lifetime of one test invocation.
#[derive(Debug)]
pub struct TestScope<'m> {
    manager: &'m TempFileManager,
    invocation: Invocation,
    finished: bool,
}

impl TestScope<'static> {
    /// Starts a test of class `C` on the process-wide manager.
    ///
    /// Also installs the `TEST_TEMP_LOG` tracing subscriber, if requested.
    #[must_use]
    pub fn begin<C: TestClass>(test_name: &str) -> Self {
        logging::init_from_env();
        let invocation = Invocation::of_class::<C>(InvocationId::from_test_name(test_name));
        TestScope::new(TempFileManager::global(), invocation)
    }
}

impl<'m> TestScope<'m> {
    /// Starts `invocation` on `manager`.
    #[must_use]
    pub fn new(manager: &'m TempFileManager, invocation: Invocation) -> Self {
        tracing::debug!(
            invocation = %invocation.id(),
            class = invocation.test_class(),
            "test scope started"
        );
        Self {
            manager,
            invocation,
            finished: false,
        }
    }

    /// The running invocation.
    #[must_use]
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The invocation root. Removed when the scope ends.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.manager.invocation_root(&self.invocation)
    }

    /// Provides a resource for an explicit request.
    ///
    /// # Errors
    ///
    /// See [`TempFileManager::provide`].
    pub fn provide(&self, request: &ResourceRequest) -> Result<Provided, TempError> {
        self.manager.provide(request, &self.invocation)
    }

    /// Provides a resource typed as `T`, requested by a single marker.
    ///
    /// # Errors
    ///
    /// See [`TempFileManager::provide`].
    pub fn provide_as<T: FromProvided>(
        &self,
        name: impl Into<Cow<'static, str>>,
        marker: Marker,
    ) -> Result<T, TempError> {
        let request = ResourceRequest::new(name, T::SHAPE).with_marker(marker);
        self.provide(&request).and_then(T::from_provided)
    }

    /// Ends the test, returning the teardown result.
    ///
    /// # Errors
    ///
    /// [`TempError::Delete`] when the invocation root cannot be removed.
    pub fn finish(mut self) -> Result<(), TempError> {
        self.finished = true;
        self.manager.teardown(&self.invocation)
    }
}

impl Drop for TestScope<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Err(err) = self.manager.teardown(&self.invocation) {
            if std::thread::panicking() {
                tracing::error!(
                    invocation = %self.invocation.id(),
                    error = %err,
                    "temp cleanup failed while the test was already failing"
                );
            } else {
                panic!(
                    "temp cleanup failed for `{}`: {err}",
                    self.invocation.id()
                );
            }
        }
    }
}
