//! # hrguard-rbac: Role-Based Access Control for HR records
//!
//! Decides, for every authenticated principal, which capabilities are
//! exposed and which organizational records (employees, leaves, performance,
//! payroll) the principal may see or mutate:
//! - **Role registry** (6 closed roles)
//! - **Permission matrix** (one fully-populated record per role)
//! - **Scope resolution** (unrestricted, one department, own records, nothing)
//! - **Authorization facade** (`can`, `authorize`, `filter_by_scope`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Route handler / page                        │
//! └─────────────────┬───────────────────────────┘
//!                   │ Principal + Capability
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Authorizer                                  │
//! │  ├─ Permission matrix (static table)         │
//! │  ├─ Scope resolver ── DepartmentDirectory    │
//! │  └─ Decision cache (optional)                │
//! └─────────────────┬───────────────────────────┘
//!                   │ AuthorizationDecision
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Caller applies filter_by_scope to records   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Roles
//!
//! | Role               | Employees | Payroll | Audit Logs | Company | Scope       |
//! |--------------------|-----------|---------|------------|---------|-------------|
//! | Owner              | ✓ (all)   | ✓       | ✓          | ✓       | All         |
//! | Admin              | ✓ (all)   | ✓       | ✓          | ✗       | All         |
//! | HR Manager         | ✓ (all)   | ✓       | ✗          | ✗       | All         |
//! | HR Specialist      | view/edit | ✗       | ✗          | ✗       | All         |
//! | Department Manager | view      | ✗       | ✗          | ✗       | Department  |
//! | Employee           | ✗         | ✗       | ✗          | ✗       | Self        |
//!
//! ## Fail-Closed
//!
//! Every ambiguity resolves to the more restrictive answer:
//! - An unknown role claim gets the employee record ([`DegradedRoleWarning`])
//! - A department manager whose directory lookup fails, times out or finds
//!   nothing gets [`Scope::None`]
//! - [`Scope::None`] filters every collection to empty
//!
//! ## Example
//!
//! ```
//! use hrguard_directory::Directory;
//! use hrguard_rbac::{Authorizer, Capability, Principal, Role};
//! use hrguard_types::{DepartmentId, PrincipalId};
//!
//! struct Employee { id: PrincipalId, department: DepartmentId }
//!
//! let directory = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));
//! let authorizer = Authorizer::new(directory);
//!
//! let staff = vec![
//!     Employee { id: PrincipalId::new(1), department: DepartmentId::new(1302) },
//!     Employee { id: PrincipalId::new(2), department: DepartmentId::new(1400) },
//! ];
//!
//! let manager = Principal::new(PrincipalId::new(5), Role::DepartmentManager);
//! let decision = authorizer.authorize(&manager, Capability::ViewEmployees);
//! let scope = decision.require()?;
//!
//! let visible = authorizer.filter_by_scope(&staff, scope, |e| e.department, |e| e.id);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id, PrincipalId::new(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod capabilities;
pub mod enforcement;
pub mod permissions;
pub mod principal;
pub mod resources;
pub mod roles;
pub mod scope;

// Re-export commonly used types
pub use cache::{CacheStats, DecisionCache};
pub use capabilities::{Capability, UnknownCapabilityError};
pub use enforcement::{
    AuthorizationDecision, Authorizer, AuthorizerStats, Requirement, UnauthorizedAccess, can,
    filter_by_scope,
};
pub use permissions::{DegradedRoleWarning, Permissions, permissions_for, permissions_for_claim};
pub use principal::Principal;
pub use resources::{Action, Resource, required_capability};
pub use roles::{Role, UnknownRoleError};
pub use scope::{Scope, ScopeResolutionError, ScopeResolver};
