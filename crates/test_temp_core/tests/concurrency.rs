//! Concurrent access tests for `TempFileManager`.
//!
//! These tests verify that parallel requests within one invocation get
//! distinct paths and that parallel invocations never share a tree.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

use test_temp_core::{
    Invocation, InvocationId, Marker, OutputShape, ResourceRequest, Role, RoleConfig, Settings,
    TempFileManager,
};

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

fn shared_manager() -> (tempfile::TempDir, Arc<TempFileManager>) {
    let storage = tempfile::tempdir().expect("create storage root");
    let manager = TempFileManager::new(Settings::new().with_storage_root(storage.path()));
    (storage, Arc::new(manager))
}

/// Many threads allocating in one role of one invocation never collide.
#[test]
fn concurrent_allocations_in_one_role_are_distinct() {
    let (_storage, manager) = shared_manager();
    let invocation = Arc::new(Invocation::new(
        InvocationId::from_test_name("concurrency::one_role"),
        RoleConfig::new(),
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let invocation = Arc::clone(&invocation);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let request =
                    ResourceRequest::new("file", OutputShape::Path).with_marker(Marker::TempFile);
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| {
                        manager
                            .provide(&request, &invocation)
                            .expect("provide")
                            .as_path()
                            .to_path_buf()
                    })
                    .collect::<Vec<PathBuf>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for path in handle.join().expect("Thread panicked") {
            assert!(seen.insert(path.clone()), "duplicate path {}", path.display());
        }
    }

    assert_eq!(seen.len(), THREADS * PER_THREAD);
    assert_eq!(
        manager.allocated(&invocation, Role::Default).len(),
        THREADS * PER_THREAD
    );

    // Dense numbering: every index from 1 to N was handed out exactly once.
    let root = manager.invocation_root(&invocation);
    for i in 1..=THREADS * PER_THREAD {
        assert!(seen.contains(&root.join(format!("file_{i}.tmp"))), "missing index {i}");
    }

    manager.teardown(&invocation).expect("teardown");
}

/// Roles interleaved across threads keep independent counters.
#[test]
fn concurrent_roles_keep_independent_numbering() {
    let (_storage, manager) = shared_manager();
    let invocation = Arc::new(Invocation::new(
        InvocationId::from_test_name("concurrency::roles"),
        RoleConfig::new().with_output_directories(true),
    ));
    let markers = [
        Marker::TempFile,
        Marker::TempInputFile,
        Marker::TempInputDirectory,
        Marker::TempOutputFile,
        Marker::TempOutputDirectory,
    ];
    let barrier = Arc::new(Barrier::new(markers.len()));

    let handles: Vec<_> = markers
        .into_iter()
        .map(|marker| {
            let manager = Arc::clone(&manager);
            let invocation = Arc::clone(&invocation);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let request = ResourceRequest::new("param", OutputShape::Path).with_marker(marker);
                barrier.wait();
                for _ in 0..PER_THREAD {
                    manager.provide(&request, &invocation).expect("provide");
                }
                marker.role()
            })
        })
        .collect();

    for handle in handles {
        let role = handle.join().expect("Thread panicked");
        assert_eq!(manager.allocated(&invocation, role).len(), PER_THREAD, "{role}");
    }

    manager.teardown(&invocation).expect("teardown");
    assert!(!manager.invocation_root(&invocation).exists());
}

/// Parallel invocations get separate roots, and tearing one down leaves the
/// others intact.
#[test]
fn parallel_invocations_are_isolated() {
    let (storage, manager) = shared_manager();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let manager = Arc::clone(&manager);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let invocation = Invocation::new(
                    InvocationId::from_test_name(&format!("concurrency::isolated_{n}")),
                    RoleConfig::new(),
                );
                let request =
                    ResourceRequest::new("out", OutputShape::Path).with_marker(Marker::TempOutputFile);
                let path = manager
                    .provide(&request, &invocation)
                    .expect("provide")
                    .as_path()
                    .to_path_buf();
                std::fs::write(&path, n.to_string()).expect("write");

                barrier.wait();
                // Every thread has written; tear down while others still hold files.
                assert_eq!(std::fs::read_to_string(&path).expect("read"), n.to_string());
                manager.teardown(&invocation).expect("teardown");
                assert!(!path.exists());
                path
            })
        })
        .collect();

    let paths: HashSet<PathBuf> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    assert_eq!(paths.len(), THREADS);
    assert_eq!(
        std::fs::read_dir(storage.path()).expect("read storage").count(),
        0
    );
}
