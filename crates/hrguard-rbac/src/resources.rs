//! Resource gating.
//!
//! Maps a (resource, action) pair to the capability it requires. Route
//! handlers and the notification/settings stores use this instead of
//! hard-coding capability names.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::capabilities::Capability;

/// Kind of record or subsystem being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Employees,
    Leaves,
    Performance,
    Payroll,
    Reports,
    AuditLogs,
    Departments,
    Company,
    Settings,
    Notifications,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Employees,
        Resource::Leaves,
        Resource::Performance,
        Resource::Payroll,
        Resource::Reports,
        Resource::AuditLogs,
        Resource::Departments,
        Resource::Company,
        Resource::Settings,
        Resource::Notifications,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::Leaves => "leaves",
            Resource::Performance => "performance",
            Resource::Payroll => "payroll",
            Resource::Reports => "reports",
            Resource::AuditLogs => "audit_logs",
            Resource::Departments => "departments",
            Resource::Company => "company",
            Resource::Settings => "settings",
            Resource::Notifications => "notifications",
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the capability required to perform `action` on `resource`.
///
/// `None` means no role may perform it through this layer. Audit logs are
/// written by the system itself, never by a principal.
///
/// # Examples
///
/// ```
/// use hrguard_rbac::capabilities::Capability;
/// use hrguard_rbac::resources::{Action, Resource, required_capability};
///
/// assert_eq!(
///     required_capability(Resource::Payroll, Action::View),
///     Some(Capability::ViewPayroll)
/// );
/// assert_eq!(required_capability(Resource::AuditLogs, Action::Delete), None);
/// ```
pub const fn required_capability(resource: Resource, action: Action) -> Option<Capability> {
    let capability = match (resource, action) {
        (Resource::Employees, Action::View) => Capability::ViewEmployees,
        (Resource::Employees, Action::Create) => Capability::ManageEmployees,
        (Resource::Employees, Action::Edit) => Capability::EditEmployees,
        (Resource::Employees, Action::Delete) => Capability::DeleteEmployees,

        // Leave lists are scoped, so requesters see their own requests.
        (Resource::Leaves, Action::View | Action::Create) => Capability::RequestLeave,
        (Resource::Leaves, Action::Edit | Action::Delete) => Capability::ManageLeaves,

        (Resource::Performance, Action::View) => Capability::ViewPerformance,
        (Resource::Performance, Action::Create | Action::Edit) => Capability::EditPerformance,
        (Resource::Performance, Action::Delete) => Capability::ManagePerformance,

        (Resource::Payroll, Action::View) => Capability::ViewPayroll,
        (Resource::Payroll, Action::Create | Action::Edit) => Capability::EditPayroll,
        (Resource::Payroll, Action::Delete) => Capability::ManagePayroll,

        (Resource::Reports, Action::View) => Capability::ViewReports,
        (Resource::Reports, _) => Capability::ManageCompany,

        (Resource::AuditLogs, Action::View) => Capability::ViewAuditLogs,
        (Resource::AuditLogs, _) => return None,

        (Resource::Departments, Action::View) => Capability::ViewEmployees,
        (Resource::Departments, _) => Capability::ManageDepartments,

        (Resource::Company | Resource::Settings, Action::View) => Capability::ManageOwnProfile,
        (Resource::Company | Resource::Settings, _) => Capability::ManageCompany,

        (Resource::Notifications, Action::Create) => Capability::ManageTeam,
        (Resource::Notifications, _) => Capability::ManageOwnProfile,
    };
    Some(capability)
}
