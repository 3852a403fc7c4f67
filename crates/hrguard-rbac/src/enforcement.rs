//! Authorization facade.
//!
//! The single entry point route handlers and pages call before rendering or
//! mutating anything. Composes the permission matrix and the scope resolver
//! into one decision; never touches record storage.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use hrguard_directory::{BoundedDirectory, DEFAULT_LOOKUP_TIMEOUT, DepartmentDirectory};
use hrguard_types::{DepartmentId, PrincipalId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, DecisionCache};
use crate::capabilities::Capability;
use crate::permissions::{Permissions, permissions_for};
use crate::principal::Principal;
use crate::resources::{Action, Resource, required_capability};
use crate::roles::Role;
use crate::scope::{Scope, ScopeResolver, fail_closed};

/// What a decision was asked to grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// A single capability flag.
    Capability(Capability),

    /// A resource operation no role may perform.
    Forbidden { resource: Resource, action: Action },
}

impl Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Capability(c) => write!(f, "{c}"),
            Requirement::Forbidden { resource, action } => write!(f, "{action} {resource}"),
        }
    }
}

/// Raised by callers that reject a request after a denied decision.
///
/// The facade itself never returns this for a denial; denial is a value
/// ([`AuthorizationDecision::allowed`] is false). Callers that want to turn
/// a denial into an error use [`AuthorizationDecision::require`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("principal {principal} with role {role} is not authorized: {requirement}")]
pub struct UnauthorizedAccess {
    pub principal: PrincipalId,
    pub role: Role,
    pub requirement: Requirement,
}

/// Outcome of one authorization check.
///
/// Always fully populated. The scope is computed even for denied decisions
/// but can only be read through accessors that check `allowed` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    principal: PrincipalId,
    role: Role,
    requirement: Requirement,
    allowed: bool,
    scope: Scope,
}

impl AuthorizationDecision {
    pub(crate) fn new(
        principal: PrincipalId,
        role: Role,
        requirement: Requirement,
        allowed: bool,
        scope: Scope,
    ) -> Self {
        Self {
            principal,
            role,
            requirement,
            allowed,
            scope,
        }
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }

    pub fn principal(&self) -> PrincipalId {
        self.principal
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Returns the capability checked, if the request mapped to one.
    pub fn capability(&self) -> Option<Capability> {
        match self.requirement {
            Requirement::Capability(c) => Some(c),
            Requirement::Forbidden { .. } => None,
        }
    }

    /// Returns the data scope, or `None` if the decision denies access.
    pub fn scope(&self) -> Option<&Scope> {
        self.allowed.then_some(&self.scope)
    }

    /// Returns the data scope, or [`UnauthorizedAccess`] if denied.
    pub fn require(&self) -> Result<&Scope, UnauthorizedAccess> {
        self.scope().ok_or(UnauthorizedAccess {
            principal: self.principal,
            role: self.role,
            requirement: self.requirement,
        })
    }
}

/// Counters exposed by [`Authorizer::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizerStats {
    /// Role claims that were outside the registry and degraded.
    pub degraded_claims: u64,
    /// Decision cache counters, if caching is enabled.
    pub cache: Option<CacheStats>,
}

/// Returns whether `principal`'s role grants `capability`.
///
/// Pure table lookup, no I/O.
pub fn can(principal: &Principal, capability: Capability) -> bool {
    permissions_for(principal.role).allows(capability)
}

/// Keeps the items visible under `scope`, preserving their order.
///
/// Deterministic and side-effect free: the same inputs always produce the
/// same output, so it is safe to reapply per page of a paginated listing.
/// [`Scope::None`] yields an empty vector without calling either selector.
///
/// # Examples
///
/// ```
/// use hrguard_rbac::{Scope, filter_by_scope};
/// use hrguard_types::{DepartmentId, PrincipalId};
///
/// let rows = vec![(1, 1302), (2, 1400), (3, 1302)];
/// let visible = filter_by_scope(
///     rows,
///     &Scope::DepartmentOnly(DepartmentId::new(1302)),
///     |(_, dept)| DepartmentId::new(*dept),
///     |(id, _)| PrincipalId::new(*id),
/// );
/// assert_eq!(visible, vec![(1, 1302), (3, 1302)]);
/// ```
pub fn filter_by_scope<T, I, FD, FO>(
    items: I,
    scope: &Scope,
    department_of: FD,
    owner_of: FO,
) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    FD: Fn(&T) -> DepartmentId,
    FO: Fn(&T) -> PrincipalId,
{
    match scope {
        Scope::Unrestricted => items.into_iter().collect(),
        Scope::DepartmentOnly(department) => items
            .into_iter()
            .filter(|item| department_of(item) == *department)
            .collect(),
        Scope::SelfOnly(owner) => items
            .into_iter()
            .filter(|item| owner_of(item) == *owner)
            .collect(),
        Scope::None => Vec::new(),
    }
}

/// Authorization engine.
///
/// Shareable across request handlers behind an `Arc`. The permission matrix
/// is a compile-time constant and the optional cache is internally
/// synchronized. Every directory lookup runs under a deadline; see
/// [`BoundedDirectory`].
///
/// # Examples
///
/// ```
/// use hrguard_directory::Directory;
/// use hrguard_rbac::{Authorizer, Capability, Principal, Role, Scope};
/// use hrguard_types::{DepartmentId, PrincipalId};
///
/// let directory = Directory::new().with_manager(PrincipalId::new(5), DepartmentId::new(1302));
/// let authorizer = Authorizer::new(directory).without_audit();
///
/// let manager = Principal::new(PrincipalId::new(5), Role::DepartmentManager);
/// let decision = authorizer.authorize(&manager, Capability::ViewEmployees);
///
/// assert!(decision.allowed());
/// assert_eq!(decision.scope(), Some(&Scope::DepartmentOnly(DepartmentId::new(1302))));
/// ```
#[derive(Debug)]
pub struct Authorizer<D> {
    resolver: ScopeResolver<BoundedDirectory<D>>,
    cache: Option<DecisionCache>,
    audit_enabled: bool,
    degraded_claims: AtomicU64,
}

impl<D: DepartmentDirectory + 'static> Authorizer<D> {
    /// Creates an authorizer without caching, with audit logging enabled.
    ///
    /// Lookups against `directory` are bounded by [`DEFAULT_LOOKUP_TIMEOUT`].
    pub fn new(directory: D) -> Self {
        Self::with_bounded(BoundedDirectory::new(directory, DEFAULT_LOOKUP_TIMEOUT))
    }

    /// Creates an authorizer over a directory with its own deadline and pool.
    pub fn with_bounded(directory: BoundedDirectory<D>) -> Self {
        Self {
            resolver: ScopeResolver::new(directory),
            cache: None,
            audit_enabled: true,
            degraded_claims: AtomicU64::new(0),
        }
    }

    /// Enables decision caching.
    pub fn with_cache(mut self, cache: DecisionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disables per-decision grant/deny logging (for testing).
    ///
    /// Anomalies (degraded roles, lookup failures) are still logged.
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Returns whether `principal` holds `capability`. See [`can`].
    pub fn can(&self, principal: &Principal, capability: Capability) -> bool {
        can(principal, capability)
    }

    /// Returns the full permission record for `principal`.
    pub fn permissions(&self, principal: &Principal) -> Permissions {
        permissions_for(principal.role)
    }

    /// Resolves `principal`'s data scope, failing closed.
    pub fn resolve_scope(&self, principal: &Principal) -> Scope {
        self.resolver
            .resolve(principal, &permissions_for(principal.role))
    }

    /// Decides whether `principal` may exercise `capability`, and over which
    /// records.
    pub fn authorize(&self, principal: &Principal, capability: Capability) -> AuthorizationDecision {
        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(principal.id, principal.role, capability));
        if let Some(decision) = cached {
            debug!(
                principal = %principal.id,
                capability = %capability,
                "Decision served from cache"
            );
            return decision;
        }

        let requirement = Requirement::Capability(capability);
        let (decision, resolved) = self.evaluate(principal, requirement);

        if let Some(cache) = &self.cache
            && resolved
        {
            cache.insert(principal.id, principal.role, capability, decision.clone());
        }

        decision
    }

    /// Decides whether `principal` may perform `action` on `resource`.
    ///
    /// Pairs that no role may perform are always denied.
    pub fn authorize_resource(
        &self,
        principal: &Principal,
        resource: Resource,
        action: Action,
    ) -> AuthorizationDecision {
        match required_capability(resource, action) {
            Some(capability) => self.authorize(principal, capability),
            None => self.evaluate(principal, Requirement::Forbidden { resource, action }).0,
        }
    }

    /// Applies `scope` to `items`. See [`filter_by_scope`].
    pub fn filter_by_scope<T, I, FD, FO>(
        &self,
        items: I,
        scope: &Scope,
        department_of: FD,
        owner_of: FO,
    ) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
        FD: Fn(&T) -> DepartmentId,
        FO: Fn(&T) -> PrincipalId,
    {
        filter_by_scope(items, scope, department_of, owner_of)
    }

    /// Authorizes `capability` and filters `items` in one step.
    ///
    /// A denied decision yields an empty vector.
    pub fn filter_authorized<T, I, FD, FO>(
        &self,
        principal: &Principal,
        capability: Capability,
        items: I,
        department_of: FD,
        owner_of: FO,
    ) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
        FD: Fn(&T) -> DepartmentId,
        FO: Fn(&T) -> PrincipalId,
    {
        match self.authorize(principal, capability).scope() {
            Some(scope) => filter_by_scope(items, scope, department_of, owner_of),
            None => Vec::new(),
        }
    }

    /// Builds a principal from raw session claims, counting degraded roles.
    pub fn principal_from_claims(&self, id: PrincipalId, raw_role: &str) -> Principal {
        let (principal, warning) = Principal::from_claims(id, raw_role);
        if warning.is_some() {
            self.degraded_claims.fetch_add(1, Ordering::Relaxed);
        }
        principal
    }

    /// Must be called when an administrator changes `principal`'s role.
    pub fn on_role_change(&self, principal: PrincipalId) {
        if let Some(cache) = &self.cache {
            let removed = cache.invalidate_principal(principal);
            info!(principal = %principal, removed, "Role changed; cached decisions dropped");
        }
    }

    pub fn stats(&self) -> AuthorizerStats {
        AuthorizerStats {
            degraded_claims: self.degraded_claims.load(Ordering::Relaxed),
            cache: self.cache.as_ref().map(DecisionCache::stats),
        }
    }

    /// The flag is false when the directory failed and the scope fell back
    /// to [`Scope::None`]; such decisions must not be cached.
    fn evaluate(
        &self,
        principal: &Principal,
        requirement: Requirement,
    ) -> (AuthorizationDecision, bool) {
        let permissions = permissions_for(principal.role);
        let allowed = match requirement {
            Requirement::Capability(capability) => permissions.allows(capability),
            Requirement::Forbidden { .. } => false,
        };
        let (scope, resolved) = match self.resolver.try_resolve(principal, &permissions) {
            Ok(scope) => (scope, true),
            Err(err) => (fail_closed(principal, &err), false),
        };

        if self.audit_enabled {
            if allowed {
                info!(
                    principal = %principal.id,
                    role = %principal.role,
                    requirement = %requirement,
                    scope = %scope,
                    "Access granted"
                );
            } else {
                warn!(
                    principal = %principal.id,
                    role = %principal.role,
                    requirement = %requirement,
                    "Access denied"
                );
            }
        }

        let decision =
            AuthorizationDecision::new(principal.id, principal.role, requirement, allowed, scope);
        (decision, resolved)
    }
}
