//! Capability names.
//!
//! A capability is one named boolean flag in a [`Permissions`] record. The
//! wire names (`canViewEmployees`, ...) are what the UI layer checks.
//!
//! [`Permissions`]: crate::permissions::Permissions

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    ViewEmployees,
    EditEmployees,
    DeleteEmployees,
    ViewPerformance,
    EditPerformance,
    ViewPayroll,
    EditPayroll,
    ViewReports,
    ManageTeam,
    ViewAuditLogs,
    ManageEmployees,
    ManagePayroll,
    ManageLeaves,
    ManagePerformance,
    ManageCompany,
    ManageDepartments,
    /// Grants unrestricted record visibility.
    ViewAllData,
    ManageOwnProfile,
    RequestLeave,
}

impl Capability {
    /// Every capability, in record field order.
    pub const ALL: [Capability; 19] = [
        Capability::ViewEmployees,
        Capability::EditEmployees,
        Capability::DeleteEmployees,
        Capability::ViewPerformance,
        Capability::EditPerformance,
        Capability::ViewPayroll,
        Capability::EditPayroll,
        Capability::ViewReports,
        Capability::ManageTeam,
        Capability::ViewAuditLogs,
        Capability::ManageEmployees,
        Capability::ManagePayroll,
        Capability::ManageLeaves,
        Capability::ManagePerformance,
        Capability::ManageCompany,
        Capability::ManageDepartments,
        Capability::ViewAllData,
        Capability::ManageOwnProfile,
        Capability::RequestLeave,
    ];

    /// Returns the camelCase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::ViewEmployees => "canViewEmployees",
            Capability::EditEmployees => "canEditEmployees",
            Capability::DeleteEmployees => "canDeleteEmployees",
            Capability::ViewPerformance => "canViewPerformance",
            Capability::EditPerformance => "canEditPerformance",
            Capability::ViewPayroll => "canViewPayroll",
            Capability::EditPayroll => "canEditPayroll",
            Capability::ViewReports => "canViewReports",
            Capability::ManageTeam => "canManageTeam",
            Capability::ViewAuditLogs => "canViewAuditLogs",
            Capability::ManageEmployees => "canManageEmployees",
            Capability::ManagePayroll => "canManagePayroll",
            Capability::ManageLeaves => "canManageLeaves",
            Capability::ManagePerformance => "canManagePerformance",
            Capability::ManageCompany => "canManageCompany",
            Capability::ManageDepartments => "canManageDepartments",
            Capability::ViewAllData => "canViewAllData",
            Capability::ManageOwnProfile => "canManageOwnProfile",
            Capability::RequestLeave => "canRequestLeave",
        }
    }

    /// Returns whether the capability mutates records.
    pub const fn is_mutation(self) -> bool {
        !matches!(
            self,
            Capability::ViewEmployees
                | Capability::ViewPerformance
                | Capability::ViewPayroll
                | Capability::ViewReports
                | Capability::ViewAuditLogs
                | Capability::ViewAllData
        )
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = UnknownCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| UnknownCapabilityError(s.to_string()))
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A capability name that is not one of the known flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capability: {0:?}")]
pub struct UnknownCapabilityError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for capability in Capability::ALL {
            assert_eq!(capability.as_str().parse::<Capability>(), Ok(capability));
        }
    }

    #[test]
    fn wire_names_are_unique() {
        let mut names: Vec<_> = Capability::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!("canviewpayroll".parse::<Capability>().is_err());
        assert!("ViewPayroll".parse::<Capability>().is_err());
    }

    #[test]
    fn view_capabilities_are_not_mutations() {
        assert!(!Capability::ViewPayroll.is_mutation());
        assert!(!Capability::ViewAllData.is_mutation());
        assert!(Capability::DeleteEmployees.is_mutation());
        assert!(Capability::RequestLeave.is_mutation());
    }

    #[test]
    fn serializes_as_wire_name() {
        let json = serde_json::to_string(&Capability::EditPayroll).unwrap();
        assert_eq!(json, "\"canEditPayroll\"");
        let parsed: Capability = serde_json::from_str("\"canManageTeam\"").unwrap();
        assert_eq!(parsed, Capability::ManageTeam);
    }
}
