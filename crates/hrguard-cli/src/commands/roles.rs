//! Role registry listing.

use hrguard_rbac::{Role, permissions_for};

use crate::style::data_table;

/// Describes the data scope a role resolves to.
pub fn scope_summary(role: Role) -> &'static str {
    if permissions_for(role).can_view_all_data {
        "all records"
    } else if role == Role::DepartmentManager {
        "own department"
    } else {
        "own records"
    }
}

pub fn run() {
    let rows: Vec<Vec<String>> = Role::ALL
        .iter()
        .map(|&role| {
            vec![
                role.as_str().to_string(),
                role.display_name().to_string(),
                scope_summary(role).to_string(),
                permissions_for(role).granted().count().to_string(),
            ]
        })
        .collect();

    println!(
        "{}",
        data_table(&["Claim", "Name", "Scope", "Capabilities"], &rows)
    );
}
