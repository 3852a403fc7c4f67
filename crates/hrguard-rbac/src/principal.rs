//! The authenticated actor behind a request.

use hrguard_types::{DepartmentId, PrincipalId};
use serde::{Deserialize, Serialize};

use crate::permissions::{DegradedRoleWarning, role_for_claim};
use crate::roles::Role;

/// Authenticated principal, built once per request from session state.
///
/// The session layer is trusted: no credential verification happens here.
/// `department_id` is informational only; scope resolution always asks the
/// department directory and never trusts a department carried by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
}

impl Principal {
    pub fn new(id: PrincipalId, role: Role) -> Self {
        Self {
            id,
            role,
            department_id: None,
        }
    }

    /// Attaches the department resolved for a department manager.
    pub fn with_department(mut self, department: DepartmentId) -> Self {
        self.department_id = Some(department);
        self
    }

    /// Builds a principal from raw session claims.
    ///
    /// An unknown role degrades to the most restrictive role; the returned
    /// warning must be reported by the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrguard_rbac::{Principal, Role};
    /// use hrguard_types::PrincipalId;
    ///
    /// let (principal, warning) = Principal::from_claims(PrincipalId::new(9), "root");
    /// assert_eq!(principal.role, Role::Employee);
    /// assert!(warning.is_some());
    /// ```
    pub fn from_claims(id: PrincipalId, raw_role: &str) -> (Self, Option<DegradedRoleWarning>) {
        let (role, warning) = role_for_claim(raw_role);
        (Self::new(id, role), warning)
    }
}
