//! Permission matrix.
//!
//! Maps each role to one fully-populated [`Permissions`] record. The six
//! rows below are authored independently: no role inherits from another, so
//! a reviewer can audit one row without reasoning about precedence.
//!
//! Adding a role to [`Role`] without a row here fails to compile
//! ([`permissions_for`] is an exhaustive match).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::capabilities::Capability;
use crate::roles::Role;

/// Role that unknown role claims degrade to.
pub const FALLBACK_ROLE: Role = Role::Employee;

/// Fixed-shape capability record.
///
/// Serializes with the camelCase wire names the UI layer consumes
/// (`canViewEmployees`, ...). Deserialization rejects missing or unknown
/// fields so a partial record can never be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Permissions {
    pub can_view_employees: bool,
    pub can_edit_employees: bool,
    pub can_delete_employees: bool,
    pub can_view_performance: bool,
    pub can_edit_performance: bool,
    pub can_view_payroll: bool,
    pub can_edit_payroll: bool,
    pub can_view_reports: bool,
    pub can_manage_team: bool,
    pub can_view_audit_logs: bool,
    pub can_manage_employees: bool,
    pub can_manage_payroll: bool,
    pub can_manage_leaves: bool,
    pub can_manage_performance: bool,
    pub can_manage_company: bool,
    pub can_manage_departments: bool,
    pub can_view_all_data: bool,
    pub can_manage_own_profile: bool,
    pub can_request_leave: bool,
}

impl Permissions {
    /// Record with every capability denied.
    pub const NONE: Permissions = Permissions {
        can_view_employees: false,
        can_edit_employees: false,
        can_delete_employees: false,
        can_view_performance: false,
        can_edit_performance: false,
        can_view_payroll: false,
        can_edit_payroll: false,
        can_view_reports: false,
        can_manage_team: false,
        can_view_audit_logs: false,
        can_manage_employees: false,
        can_manage_payroll: false,
        can_manage_leaves: false,
        can_manage_performance: false,
        can_manage_company: false,
        can_manage_departments: false,
        can_view_all_data: false,
        can_manage_own_profile: false,
        can_request_leave: false,
    };

    /// Returns whether this record grants `capability`.
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewEmployees => self.can_view_employees,
            Capability::EditEmployees => self.can_edit_employees,
            Capability::DeleteEmployees => self.can_delete_employees,
            Capability::ViewPerformance => self.can_view_performance,
            Capability::EditPerformance => self.can_edit_performance,
            Capability::ViewPayroll => self.can_view_payroll,
            Capability::EditPayroll => self.can_edit_payroll,
            Capability::ViewReports => self.can_view_reports,
            Capability::ManageTeam => self.can_manage_team,
            Capability::ViewAuditLogs => self.can_view_audit_logs,
            Capability::ManageEmployees => self.can_manage_employees,
            Capability::ManagePayroll => self.can_manage_payroll,
            Capability::ManageLeaves => self.can_manage_leaves,
            Capability::ManagePerformance => self.can_manage_performance,
            Capability::ManageCompany => self.can_manage_company,
            Capability::ManageDepartments => self.can_manage_departments,
            Capability::ViewAllData => self.can_view_all_data,
            Capability::ManageOwnProfile => self.can_manage_own_profile,
            Capability::RequestLeave => self.can_request_leave,
        }
    }

    /// Iterates the granted capabilities in field order.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(move |c| self.allows(*c))
    }

    /// Returns whether every capability granted here is also granted by `other`.
    pub fn is_subset_of(&self, other: &Permissions) -> bool {
        self.granted().all(|c| other.allows(c))
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::NONE
    }
}

const OWNER: Permissions = Permissions {
    can_view_employees: true,
    can_edit_employees: true,
    can_delete_employees: true,
    can_view_performance: true,
    can_edit_performance: true,
    can_view_payroll: true,
    can_edit_payroll: true,
    can_view_reports: true,
    can_manage_team: true,
    can_view_audit_logs: true,
    can_manage_employees: true,
    can_manage_payroll: true,
    can_manage_leaves: true,
    can_manage_performance: true,
    can_manage_company: true,
    can_manage_departments: true,
    can_view_all_data: true,
    can_manage_own_profile: true,
    can_request_leave: true,
};

const ADMIN: Permissions = Permissions {
    can_view_employees: true,
    can_edit_employees: true,
    can_delete_employees: true,
    can_view_performance: true,
    can_edit_performance: true,
    can_view_payroll: true,
    can_edit_payroll: true,
    can_view_reports: true,
    can_manage_team: true,
    can_view_audit_logs: true,
    can_manage_employees: true,
    can_manage_payroll: true,
    can_manage_leaves: true,
    can_manage_performance: true,
    can_manage_company: false,
    can_manage_departments: true,
    can_view_all_data: true,
    can_manage_own_profile: true,
    can_request_leave: true,
};

const HR_MANAGER: Permissions = Permissions {
    can_view_employees: true,
    can_edit_employees: true,
    can_delete_employees: true,
    can_view_performance: true,
    can_edit_performance: true,
    can_view_payroll: true,
    can_edit_payroll: true,
    can_view_reports: true,
    can_manage_team: true,
    can_view_audit_logs: false,
    can_manage_employees: true,
    can_manage_payroll: true,
    can_manage_leaves: true,
    can_manage_performance: true,
    can_manage_company: false,
    can_manage_departments: true,
    can_view_all_data: true,
    can_manage_own_profile: true,
    can_request_leave: true,
};

const HR_SPECIALIST: Permissions = Permissions {
    can_view_employees: true,
    can_edit_employees: true,
    can_delete_employees: false,
    can_view_performance: true,
    can_edit_performance: false,
    can_view_payroll: false,
    can_edit_payroll: false,
    can_view_reports: true,
    can_manage_team: false,
    can_view_audit_logs: false,
    can_manage_employees: true,
    can_manage_payroll: false,
    can_manage_leaves: true,
    can_manage_performance: false,
    can_manage_company: false,
    can_manage_departments: false,
    can_view_all_data: true,
    can_manage_own_profile: true,
    can_request_leave: true,
};

const DEPARTMENT_MANAGER: Permissions = Permissions {
    can_view_employees: true,
    can_edit_employees: false,
    can_delete_employees: false,
    can_view_performance: true,
    can_edit_performance: true,
    can_view_payroll: false,
    can_edit_payroll: false,
    can_view_reports: true,
    can_manage_team: true,
    can_view_audit_logs: false,
    can_manage_employees: false,
    can_manage_payroll: false,
    can_manage_leaves: true,
    can_manage_performance: true,
    can_manage_company: false,
    can_manage_departments: false,
    can_view_all_data: false,
    can_manage_own_profile: true,
    can_request_leave: true,
};

const EMPLOYEE: Permissions = Permissions {
    can_view_employees: false,
    can_edit_employees: false,
    can_delete_employees: false,
    can_view_performance: false,
    can_edit_performance: false,
    can_view_payroll: false,
    can_edit_payroll: false,
    can_view_reports: false,
    can_manage_team: false,
    can_view_audit_logs: false,
    can_manage_employees: false,
    can_manage_payroll: false,
    can_manage_leaves: false,
    can_manage_performance: false,
    can_manage_company: false,
    can_manage_departments: false,
    can_view_all_data: false,
    can_manage_own_profile: true,
    can_request_leave: true,
};

/// Returns the permission record for `role`.
///
/// # Examples
///
/// ```
/// use hrguard_rbac::capabilities::Capability;
/// use hrguard_rbac::permissions::permissions_for;
/// use hrguard_rbac::roles::Role;
///
/// assert!(permissions_for(Role::HrManager).allows(Capability::ViewPayroll));
/// assert!(!permissions_for(Role::HrSpecialist).allows(Capability::ViewPayroll));
/// ```
pub const fn permissions_for(role: Role) -> Permissions {
    match role {
        Role::Owner => OWNER,
        Role::Admin => ADMIN,
        Role::HrManager => HR_MANAGER,
        Role::HrSpecialist => HR_SPECIALIST,
        Role::DepartmentManager => DEPARTMENT_MANAGER,
        Role::Employee => EMPLOYEE,
    }
}

/// Resolves a raw role claim (e.g. from a session) to a permission record.
///
/// Unknown claims never fail the caller: they get the [`FALLBACK_ROLE`]
/// record and a [`DegradedRoleWarning`], which is also logged.
pub fn permissions_for_claim(raw: &str) -> (Permissions, Option<DegradedRoleWarning>) {
    let (role, warning) = role_for_claim(raw);
    (permissions_for(role), warning)
}

/// Parses a raw role claim, degrading unknown values to [`FALLBACK_ROLE`].
pub fn role_for_claim(raw: &str) -> (Role, Option<DegradedRoleWarning>) {
    match Role::parse(raw) {
        Ok(role) => (role, None),
        Err(err) => {
            warn!(
                claim = %err.claim(),
                fallback = %FALLBACK_ROLE,
                "Unknown role claim degraded to most restrictive permissions"
            );
            (
                FALLBACK_ROLE,
                Some(DegradedRoleWarning {
                    claim: err.claim().to_string(),
                    fallback: FALLBACK_ROLE,
                }),
            )
        }
    }
}

/// Report that a role claim was outside the registry and was degraded.
///
/// Not an error for the caller (the request proceeds with the fallback
/// record) but a signal that session or directory data is wrong upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role claim {claim:?} is not a known role; degraded to {fallback}")]
pub struct DegradedRoleWarning {
    pub claim: String,
    pub fallback: Role,
}
