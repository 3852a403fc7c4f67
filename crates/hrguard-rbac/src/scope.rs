//! Data scope resolution.
//!
//! A scope narrows which records a principal may see. It is resolved by a
//! strict priority chain; the first matching rule wins:
//!
//! 1. `canViewAllData` → [`Scope::Unrestricted`]
//! 2. department manager → [`Scope::DepartmentOnly`] for the department the
//!    directory assigns, or [`Scope::None`] if the lookup fails in any way
//! 3. `canManageOwnProfile` → [`Scope::SelfOnly`]
//! 4. otherwise → [`Scope::None`]

use std::fmt::{self, Display};
use std::time::Duration;

use hrguard_directory::{DepartmentDirectory, DirectoryError};
use hrguard_types::{DepartmentId, PrincipalId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::permissions::Permissions;
use crate::principal::Principal;
use crate::roles::Role;

/// Subset of records a principal's view is narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    /// Every record.
    Unrestricted,

    /// Records belonging to one department.
    DepartmentOnly(DepartmentId),

    /// Records owned by one principal.
    SelfOnly(PrincipalId),

    /// No records at all, not even counts.
    None,
}

impl Scope {
    /// Returns whether a record in `department` owned by `owner` is visible.
    pub fn permits(&self, department: DepartmentId, owner: PrincipalId) -> bool {
        match self {
            Scope::Unrestricted => true,
            Scope::DepartmentOnly(d) => *d == department,
            Scope::SelfOnly(p) => *p == owner,
            Scope::None => false,
        }
    }

    /// Returns true for [`Scope::None`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::None)
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Unrestricted => f.write_str("unrestricted"),
            Scope::DepartmentOnly(d) => write!(f, "department:{d}"),
            Scope::SelfOnly(p) => write!(f, "self:{p}"),
            Scope::None => f.write_str("none"),
        }
    }
}

/// Why a department manager's scope could not be resolved.
///
/// Every variant resolves to [`Scope::None`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeResolutionError {
    /// The directory has no department for this manager.
    #[error("no department found for manager {manager}")]
    NotFound { manager: PrincipalId },

    /// The directory did not answer in time.
    #[error("department lookup for manager {manager} timed out after {timeout:?}")]
    Timeout {
        manager: PrincipalId,
        timeout: Duration,
    },

    /// The directory failed.
    #[error("department lookup for manager {manager} failed: {reason}")]
    Unavailable { manager: PrincipalId, reason: String },
}

impl ScopeResolutionError {
    fn from_directory(manager: PrincipalId, err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => Self::NotFound { manager },
            DirectoryError::Timeout { timeout, .. } => Self::Timeout { manager, timeout },
            DirectoryError::Unavailable(reason) => Self::Unavailable { manager, reason },
        }
    }
}

/// Logs a resolution failure and returns [`Scope::None`].
pub(crate) fn fail_closed(principal: &Principal, err: &ScopeResolutionError) -> Scope {
    warn!(
        principal = %principal.id,
        role = %principal.role,
        error = %err,
        "Scope resolution failed; denying all records"
    );
    Scope::None
}

/// Resolves scopes against a department directory.
#[derive(Debug, Clone)]
pub struct ScopeResolver<D> {
    directory: D,
}

impl<D: DepartmentDirectory> ScopeResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolves the scope for `principal` holding `permissions`.
    ///
    /// Lookup failures are logged and resolve to [`Scope::None`]; this never
    /// returns a wider scope than [`try_resolve`](Self::try_resolve) would.
    pub fn resolve(&self, principal: &Principal, permissions: &Permissions) -> Scope {
        self.try_resolve(principal, permissions)
            .unwrap_or_else(|err| fail_closed(principal, &err))
    }

    /// Resolves the scope, surfacing directory failures.
    pub fn try_resolve(
        &self,
        principal: &Principal,
        permissions: &Permissions,
    ) -> Result<Scope, ScopeResolutionError> {
        if permissions.can_view_all_data {
            return Ok(Scope::Unrestricted);
        }

        if principal.role == Role::DepartmentManager {
            return self
                .directory
                .department_of(principal.id)
                .map(Scope::DepartmentOnly)
                .map_err(|e| ScopeResolutionError::from_directory(principal.id, e));
        }

        if permissions.can_manage_own_profile {
            return Ok(Scope::SelfOnly(principal.id));
        }

        Ok(Scope::None)
    }
}
