//! Role registry.
//!
//! The closed set of roles a principal can hold, from most to least
//! privileged:
//! - Owner: the account holder, everything
//! - Admin: everything except company-level settings
//! - HrManager: all HR records including payroll
//! - HrSpecialist: day-to-day HR records, no payroll
//! - DepartmentManager: own department's records only
//! - Employee: own profile and leave requests only

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role held by a principal.
///
/// Assigned at account creation and only changed by an explicit
/// administrative action. The wire form is the snake_case name
/// (`hr_manager`, `department_manager`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Account owner.
    ///
    /// **Permissions:**
    /// - Every capability, including company settings and audit logs
    ///
    /// **Use Cases:**
    /// - Founder or legal owner of the tenant
    Owner,

    /// Application administrator.
    ///
    /// **Permissions:**
    /// - Every capability except managing company-level settings
    ///
    /// **Use Cases:**
    /// - IT staff operating the tenant
    Admin,

    /// Head of HR.
    ///
    /// **Permissions:**
    /// - Full employee, performance, payroll and leave management
    /// - Department structure management
    /// - No audit log access
    HrManager,

    /// HR staff member.
    ///
    /// **Permissions:**
    /// - View and edit employee records, manage leaves
    /// - View performance, never payroll
    HrSpecialist,

    /// Manager of a single department.
    ///
    /// **Permissions:**
    /// - Team, leave and performance management
    /// - Visibility limited to the department the directory assigns
    DepartmentManager,

    /// Regular employee.
    ///
    /// **Permissions:**
    /// - Manage own profile and request leave
    /// - Visibility limited to own records
    Employee,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Owner,
        Role::Admin,
        Role::HrManager,
        Role::HrSpecialist,
        Role::DepartmentManager,
        Role::Employee,
    ];

    /// Returns every role in the registry.
    pub fn all() -> &'static [Role] {
        &Self::ALL
    }

    /// Returns the snake_case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::HrManager => "hr_manager",
            Role::HrSpecialist => "hr_specialist",
            Role::DepartmentManager => "department_manager",
            Role::Employee => "employee",
        }
    }

    /// Returns the human-readable label shown in the UI.
    pub const fn display_name(self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Admin => "Administrator",
            Role::HrManager => "HR Manager",
            Role::HrSpecialist => "HR Specialist",
            Role::DepartmentManager => "Department Manager",
            Role::Employee => "Employee",
        }
    }

    /// Parses a wire name into a role.
    ///
    /// Surrounding whitespace and ASCII case are ignored. Anything else that
    /// is not one of the six wire names is rejected; no guessing.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrguard_rbac::roles::Role;
    ///
    /// assert_eq!(Role::parse("hr_manager").unwrap(), Role::HrManager);
    /// assert_eq!(Role::parse(" Owner ").unwrap(), Role::Owner);
    /// assert!(Role::parse("superuser").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Role, UnknownRoleError> {
        let normalized = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownRoleError::new(raw))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s)
    }
}

/// A role value outside the closed enumeration.
///
/// Indicates a data or configuration problem upstream (a stale session, a
/// role added in another service). Callers degrade to the most restrictive
/// permissions instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {claim:?}")]
pub struct UnknownRoleError {
    claim: String,
}

impl UnknownRoleError {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
        }
    }

    /// Returns the rejected role value as received.
    pub fn claim(&self) -> &str {
        &self.claim
    }
}
