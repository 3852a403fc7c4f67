//! Unit tests for hrguard-directory

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use hrguard_types::{DepartmentId, PrincipalId};

use crate::{BoundedDirectory, DepartmentDirectory, Directory, DirectoryError};

/// Directory that answers only after a fixed delay.
struct SlowDirectory {
    delay: Duration,
    inner: Directory,
}

impl DepartmentDirectory for SlowDirectory {
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        thread::sleep(self.delay);
        self.inner.department_of(manager)
    }
}

/// Directory whose backing store is down.
struct FailingDirectory;

impl DepartmentDirectory for FailingDirectory {
    fn department_of(&self, _manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".to_string()))
    }
}

/// Remote-style directory that records which threads served its lookups.
struct TrackingDirectory {
    delay: Duration,
    threads: Mutex<HashSet<ThreadId>>,
}

impl TrackingDirectory {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            threads: Mutex::new(HashSet::new()),
        })
    }

    fn distinct_threads(&self) -> usize {
        self.threads.lock().unwrap().len()
    }
}

impl DepartmentDirectory for TrackingDirectory {
    fn department_of(&self, _manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        self.threads.lock().unwrap().insert(thread::current().id());
        thread::sleep(self.delay);
        Ok(DepartmentId::new(1302))
    }
}

// ============================================================================
// Directory Tests
// ============================================================================

#[test]
fn assigned_manager_resolves_department() {
    let directory = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));

    let department = directory.department_of(PrincipalId::new(5)).unwrap();
    assert_eq!(department, DepartmentId::new(1302));
}

#[test]
fn unassigned_manager_returns_not_found() {
    let directory = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));

    let result = directory.department_of(PrincipalId::new(6));
    assert_eq!(result, Err(DirectoryError::NotFound(PrincipalId::new(6))));
}

#[test]
fn empty_directory_finds_nothing() {
    let directory = Directory::new();
    assert!(directory.is_empty());
    assert!(directory.department_of(PrincipalId::new(1)).is_err());
}

#[test]
fn duplicate_assignment_overwrites_previous() {
    let directory = Directory::new()
        .with_manager(PrincipalId::new(5), DepartmentId::new(1302))
        .with_manager(PrincipalId::new(5), DepartmentId::new(1400));

    assert_eq!(directory.len(), 1);
    assert_eq!(
        directory.department_of(PrincipalId::new(5)).unwrap(),
        DepartmentId::new(1400)
    );
}

#[test]
fn from_assignments_matches_builder() {
    let built = Directory::new()
        .with_manager(PrincipalId::new(1), DepartmentId::new(10))
        .with_manager(PrincipalId::new(2), DepartmentId::new(20));
    let collected = Directory::from_assignments([
        (PrincipalId::new(1), DepartmentId::new(10)),
        (PrincipalId::new(2), DepartmentId::new(20)),
    ]);

    assert_eq!(built, collected);
}

#[test]
fn directory_is_shareable_across_threads() {
    let directory = Arc::new(
        Directory::new()
            .with_manager(PrincipalId::new(1), DepartmentId::new(10))
            .with_manager(PrincipalId::new(2), DepartmentId::new(20)),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let directory = Arc::clone(&directory);
            thread::spawn(move || {
                let manager = PrincipalId::new(1 + (i % 2));
                directory.department_of(manager).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 { 10 } else { 20 };
        assert_eq!(handle.join().unwrap(), DepartmentId::new(expected));
    }
}

// ============================================================================
// BoundedDirectory Tests
// ============================================================================

#[test]
fn bounded_lookup_within_deadline_succeeds() {
    let inner = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));
    let bounded = BoundedDirectory::new(inner, Duration::from_secs(2));

    assert_eq!(
        bounded.department_of(PrincipalId::new(5)).unwrap(),
        DepartmentId::new(1302)
    );
}

#[test]
fn bounded_lookup_passes_not_found_through() {
    let bounded = BoundedDirectory::new(Directory::new(), Duration::from_secs(2));

    assert_eq!(
        bounded.department_of(PrincipalId::new(5)),
        Err(DirectoryError::NotFound(PrincipalId::new(5)))
    );
}

#[test]
fn slow_lookup_times_out() {
    let slow = SlowDirectory {
        delay: Duration::from_millis(500),
        inner: Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302)),
    };
    let bounded = BoundedDirectory::new(slow, Duration::from_millis(20));

    let started = Instant::now();
    let result = bounded.department_of(PrincipalId::new(5));

    assert!(matches!(result, Err(DirectoryError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_millis(450));
}

#[test]
fn failing_store_reports_unavailable() {
    let bounded = BoundedDirectory::new(FailingDirectory, Duration::from_secs(1));

    assert!(matches!(
        bounded.department_of(PrincipalId::new(1)),
        Err(DirectoryError::Unavailable(_))
    ));
}

#[test]
fn arc_dyn_directory_can_be_bounded() {
    let inner: Arc<dyn DepartmentDirectory> =
        Arc::new(Directory::new().with_manager(PrincipalId::new(3), DepartmentId::new(7)));
    let bounded = BoundedDirectory::new(inner, Duration::from_secs(1));

    assert_eq!(bounded.timeout(), Duration::from_secs(1));
    assert_eq!(
        bounded.department_of(PrincipalId::new(3)).unwrap(),
        DepartmentId::new(7)
    );
}

#[test]
fn hung_store_holds_a_bounded_number_of_threads() {
    let store = TrackingDirectory::new(Duration::from_millis(300));
    let bounded = BoundedDirectory::from_arc(Arc::clone(&store), Duration::from_millis(1))
        .with_pool_size(2, 4);

    let mut saturated = 0;
    for id in 0..300 {
        match bounded.department_of(PrincipalId::new(id)) {
            Err(DirectoryError::Unavailable(_)) => saturated += 1,
            Err(DirectoryError::Timeout { .. }) => {}
            other => panic!("lookup against a hung store returned {other:?}"),
        }
    }

    assert!(saturated > 0);
    assert!(store.distinct_threads() <= 2);
}

#[test]
fn clones_share_one_pool() {
    let store = TrackingDirectory::new(Duration::ZERO);
    let bounded = BoundedDirectory::from_arc(Arc::clone(&store), Duration::from_secs(2))
        .with_pool_size(1, 8);
    let clone = bounded.clone();

    for id in 0..10 {
        assert!(bounded.department_of(PrincipalId::new(id)).is_ok());
        assert!(clone.department_of(PrincipalId::new(id)).is_ok());
    }

    assert_eq!(bounded.workers(), 1);
    assert_eq!(store.distinct_threads(), 1);
}

#[test]
fn in_memory_directory_is_queried_inline() {
    let inner = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));
    assert!(inner.is_in_memory());
    assert!(!FailingDirectory.is_in_memory());

    let bounded = BoundedDirectory::new(inner, Duration::from_millis(1));
    for _ in 0..100 {
        assert_eq!(
            bounded.department_of(PrincipalId::new(5)),
            Ok(DepartmentId::new(1302))
        );
    }
    assert!(format!("{bounded:?}").contains("started: false"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

use proptest::prelude::*;

proptest! {
    /// Property: every assigned manager resolves to exactly its department
    #[test]
    fn prop_assigned_manager_always_resolves(
        manager in any::<u64>(),
        department in any::<u64>(),
    ) {
        let directory = Directory::new()
            .with_manager(PrincipalId::new(manager), DepartmentId::new(department));

        let result = directory.department_of(PrincipalId::new(manager));
        prop_assert_eq!(result, Ok(DepartmentId::new(department)));
    }

    /// Property: a manager absent from the directory never resolves
    #[test]
    fn prop_absent_manager_never_resolves(
        assigned in prop::collection::hash_set(0u64..1000, 0..20),
        unassigned in 1000u64..2000,
    ) {
        let directory = Directory::from_assignments(
            assigned.iter().map(|&m| (PrincipalId::new(m), DepartmentId::new(m * 10))),
        );

        prop_assert!(directory.department_of(PrincipalId::new(unassigned)).is_err());
    }
}

// ============================================================================
// Table-Driven Tests
// ============================================================================

use test_case::test_case;

#[test_case(1, Some(1302); "engineering manager")]
#[test_case(2, Some(1400); "sales manager")]
#[test_case(3, None; "unassigned manager")]
fn lookup_table(manager: u64, expected: Option<u64>) {
    let directory = Directory::new()
        .with_manager(PrincipalId::new(1), DepartmentId::new(1302))
        .with_manager(PrincipalId::new(2), DepartmentId::new(1400));

    let result = directory.department_of(PrincipalId::new(manager)).ok();
    assert_eq!(result, expected.map(DepartmentId::new));
}
