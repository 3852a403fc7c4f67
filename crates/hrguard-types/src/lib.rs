//! # hrguard-types: Core types for `hrguard`
//!
//! Identifier newtypes shared by every hrguard crate:
//! - Principals ([`PrincipalId`]): the authenticated actor behind a request
//! - Departments ([`DepartmentId`]): the organizational unit records belong to
//!
//! Both are `Copy` 8-byte values so they can be passed by value through the
//! decision path without allocation.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs - All Copy (cheap 8-byte values)
// ============================================================================

/// Unique identifier for an authenticated principal (a user account).
///
/// Employees, managers and administrators share the same id space: a
/// record's owner is the principal it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(u64);

impl PrincipalId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the id as a `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PrincipalId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PrincipalId> for u64 {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

/// Unique identifier for a department.
///
/// # Examples
///
/// ```
/// # use hrguard_types::DepartmentId;
/// let engineering = DepartmentId::new(1302);
/// assert_eq!(engineering.to_string(), "1302");
/// assert_eq!(u64::from(engineering), 1302);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepartmentId(u64);

impl DepartmentId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the id as a `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DepartmentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<DepartmentId> for u64 {
    fn from(id: DepartmentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(PrincipalId::new(7).to_string(), "7");
        assert_eq!(DepartmentId::new(1400).to_string(), "1400");
    }

    #[test]
    fn ids_serialize_transparently_as_numbers() {
        let json = serde_json::to_string(&DepartmentId::new(1302)).unwrap();
        assert_eq!(json, "1302");

        let id: PrincipalId = serde_json::from_str("42").unwrap();
        assert_eq!(id, PrincipalId::new(42));
    }

    proptest! {
        #[test]
        fn prop_u64_conversion_is_lossless(raw in any::<u64>()) {
            prop_assert_eq!(u64::from(PrincipalId::from(raw)), raw);
            prop_assert_eq!(u64::from(DepartmentId::from(raw)), raw);
        }
    }
}
