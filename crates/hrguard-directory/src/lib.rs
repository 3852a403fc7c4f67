//! hrguard-directory: Department lookups for `hrguard`
//!
//! The directory answers one question: which department does a department
//! manager run? Scope resolution narrows a manager's view to the answer, so
//! a wrong or missing answer must never widen what the manager can see.
//!
//! # Implementations
//!
//! - [`Directory`]: in-memory mapping, typically seeded from configuration
//!   once at startup and shared read-only afterwards.
//! - [`BoundedDirectory`]: wraps any other directory, runs its lookups on a
//!   bounded worker pool and enforces a deadline. A lookup that misses the
//!   deadline reports [`DirectoryError::Timeout`].
//!
//! # Example
//!
//! ```
//! use hrguard_directory::{DepartmentDirectory, Directory};
//! use hrguard_types::{DepartmentId, PrincipalId};
//!
//! let directory = Directory::new()
//!     .with_manager(PrincipalId::new(5), DepartmentId::new(1302))
//!     .with_manager(PrincipalId::new(6), DepartmentId::new(1400));
//!
//! assert_eq!(
//!     directory.department_of(PrincipalId::new(5)).unwrap(),
//!     DepartmentId::new(1302)
//! );
//! assert!(directory.department_of(PrincipalId::new(99)).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use hrguard_types::{DepartmentId, PrincipalId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default deadline for a single directory lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(250);

/// Source of manager → department assignments.
///
/// Implementations may be backed by a remote store, so callers must treat
/// every lookup as fallible. Scope resolution maps any error to the empty
/// scope.
pub trait DepartmentDirectory: Send + Sync {
    /// Returns the department managed by `manager`.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::NotFound`] if the principal manages no department.
    /// - [`DirectoryError::Timeout`] if the lookup exceeded its deadline.
    /// - [`DirectoryError::Unavailable`] if the backing store failed.
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError>;

    /// Returns true if lookups answer from memory without blocking.
    ///
    /// [`BoundedDirectory`] calls such directories inline instead of
    /// handing the lookup to a worker.
    fn is_in_memory(&self) -> bool {
        false
    }
}

impl<T: DepartmentDirectory + ?Sized> DepartmentDirectory for Arc<T> {
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        (**self).department_of(manager)
    }

    fn is_in_memory(&self) -> bool {
        (**self).is_in_memory()
    }
}

impl<T: DepartmentDirectory + ?Sized> DepartmentDirectory for &T {
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        (**self).department_of(manager)
    }

    fn is_in_memory(&self) -> bool {
        (**self).is_in_memory()
    }
}

/// In-memory department directory.
///
/// # Thread Safety
///
/// Directory is `Clone` and can be shared across threads. It's typically
/// created once at startup and never mutated afterwards; a changed mapping
/// means building a new directory and swapping it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    assignments: HashMap<PrincipalId, DepartmentId>,
}

impl Directory {
    /// Creates an empty directory. Every lookup reports `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `department` to `manager`, replacing any previous assignment.
    pub fn with_manager(mut self, manager: PrincipalId, department: DepartmentId) -> Self {
        self.assignments.insert(manager, department);
        self
    }

    /// Builds a directory from `(manager, department)` pairs.
    ///
    /// Later pairs win when a manager appears more than once.
    pub fn from_assignments(
        assignments: impl IntoIterator<Item = (PrincipalId, DepartmentId)>,
    ) -> Self {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }

    /// Returns the number of managers with an assignment.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns true if no manager has an assignment.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl DepartmentDirectory for Directory {
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        self.assignments
            .get(&manager)
            .copied()
            .ok_or(DirectoryError::NotFound(manager))
    }

    fn is_in_memory(&self) -> bool {
        true
    }
}

/// Default number of worker threads serving bounded lookups.
pub const DEFAULT_LOOKUP_WORKERS: usize = 4;

/// Default number of lookups that may wait for a free worker.
pub const DEFAULT_LOOKUP_QUEUE: usize = 64;

/// Enforces a deadline on another directory's lookups.
///
/// Lookups run on a fixed pool of worker threads, started on first use and
/// shared by every clone. The caller waits at most `timeout` for the answer.
/// When every worker is busy and the queue is full, new lookups fail at once
/// with [`DirectoryError::Unavailable`], so a hung backing store holds at
/// most `workers` threads. Directories that answer from memory
/// ([`DepartmentDirectory::is_in_memory`]) are called inline.
///
/// The workers exit once the last clone is dropped and their current
/// lookup returns.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hrguard_directory::{BoundedDirectory, DepartmentDirectory, Directory};
/// use hrguard_types::{DepartmentId, PrincipalId};
///
/// let inner = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));
/// let bounded = BoundedDirectory::new(inner, Duration::from_millis(100));
///
/// assert_eq!(bounded.department_of(PrincipalId::new(5)).unwrap(), DepartmentId::new(1302));
/// ```
pub struct BoundedDirectory<D> {
    inner: Arc<D>,
    timeout: Duration,
    workers: usize,
    queue_depth: usize,
    pool: Arc<OnceLock<Result<SyncSender<LookupJob>, String>>>,
}

struct LookupJob {
    manager: PrincipalId,
    deadline: Instant,
    reply: SyncSender<Result<DepartmentId, DirectoryError>>,
}

impl<D> Clone for BoundedDirectory<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
            workers: self.workers,
            queue_depth: self.queue_depth,
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<D> fmt::Debug for BoundedDirectory<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedDirectory")
            .field("timeout", &self.timeout)
            .field("workers", &self.workers)
            .field("queue_depth", &self.queue_depth)
            .field("started", &self.pool.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<D: DepartmentDirectory + 'static> BoundedDirectory<D> {
    /// Wraps `inner`, bounding every lookup by `timeout`.
    pub fn new(inner: D, timeout: Duration) -> Self {
        Self::from_arc(Arc::new(inner), timeout)
    }

    /// Wraps an already shared directory.
    pub fn from_arc(inner: Arc<D>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            workers: DEFAULT_LOOKUP_WORKERS,
            queue_depth: DEFAULT_LOOKUP_QUEUE,
            pool: Arc::new(OnceLock::new()),
        }
    }

    /// Sets the worker count and queue depth. Both are at least one.
    ///
    /// Takes effect only before the first lookup.
    pub fn with_pool_size(mut self, workers: usize, queue_depth: usize) -> Self {
        self.workers = workers.max(1);
        self.queue_depth = queue_depth.max(1);
        self
    }

    /// Returns the lookup deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    fn jobs(&self) -> Result<&SyncSender<LookupJob>, DirectoryError> {
        self.pool
            .get_or_init(|| self.start_workers())
            .as_ref()
            .map_err(|reason| DirectoryError::Unavailable(reason.clone()))
    }

    fn start_workers(&self) -> Result<SyncSender<LookupJob>, String> {
        let (jobs, queue) = mpsc::sync_channel::<LookupJob>(self.queue_depth);
        let queue = Arc::new(Mutex::new(queue));

        let mut started = 0;
        for index in 0..self.workers {
            let inner = Arc::clone(&self.inner);
            let queue = Arc::clone(&queue);
            let spawned = thread::Builder::new()
                .name(format!("hrguard-directory-{index}"))
                .spawn(move || run_worker(&*inner, &queue));
            match spawned {
                Ok(_) => started += 1,
                Err(e) => warn!(error = %e, "Failed to start directory lookup worker"),
            }
        }

        if started == 0 {
            return Err("no directory lookup worker could be started".to_string());
        }
        debug!(
            workers = started,
            queue_depth = self.queue_depth,
            "Directory lookup pool started"
        );
        Ok(jobs)
    }
}

fn run_worker<D: DepartmentDirectory>(inner: &D, queue: &Mutex<Receiver<LookupJob>>) {
    loop {
        let next = queue.lock().recv();
        let Ok(job) = next else {
            return;
        };
        // The caller has already given up on this one.
        if Instant::now() >= job.deadline {
            continue;
        }
        let _ = job.reply.send(inner.department_of(job.manager));
    }
}

impl<D: DepartmentDirectory + 'static> DepartmentDirectory for BoundedDirectory<D> {
    fn department_of(&self, manager: PrincipalId) -> Result<DepartmentId, DirectoryError> {
        if self.inner.is_in_memory() {
            return self.inner.department_of(manager);
        }

        let (reply, answer) = mpsc::sync_channel(1);
        let job = LookupJob {
            manager,
            deadline: Instant::now() + self.timeout,
            reply,
        };

        match self.jobs()?.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    manager = %manager,
                    workers = self.workers,
                    "Directory lookup pool saturated"
                );
                return Err(DirectoryError::Unavailable("lookup pool saturated".to_string()));
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(DirectoryError::Unavailable("lookup pool stopped".to_string()));
            }
        }

        match answer.recv_timeout(self.timeout) {
            Ok(result) => {
                debug!(manager = %manager, ok = result.is_ok(), "Directory lookup finished");
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    manager = %manager,
                    timeout = ?self.timeout,
                    "Directory lookup timed out"
                );
                Err(DirectoryError::Timeout {
                    manager,
                    timeout: self.timeout,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(DirectoryError::Unavailable(
                "lookup worker dropped the request".to_string(),
            )),
        }
    }
}

/// Errors that can occur during directory lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The principal has no department assignment.
    #[error("no department assigned to manager {0}")]
    NotFound(PrincipalId),

    /// The lookup did not complete within its deadline.
    #[error("department lookup for manager {manager} timed out after {timeout:?}")]
    Timeout {
        manager: PrincipalId,
        timeout: Duration,
    },

    /// The backing store failed.
    #[error("department directory unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests;
