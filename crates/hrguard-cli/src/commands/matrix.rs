//! Permission matrix rendering.

use anyhow::Result;
use hrguard_rbac::{Capability, Role, permissions_for};
use serde_json::{Value, json};

use crate::Format;
use crate::style::flag_table;

/// One row per capability, one column per role.
fn rows() -> Vec<(String, Vec<bool>)> {
    Capability::ALL
        .iter()
        .map(|&capability| {
            let flags = Role::ALL
                .iter()
                .map(|&role| permissions_for(role).allows(capability))
                .collect();
            (capability.as_str().to_string(), flags)
        })
        .collect()
}

fn as_json() -> Result<Value> {
    let roles = Role::ALL
        .iter()
        .map(|&role| -> Result<Value> {
            Ok(json!({
                "role": role,
                "name": role.display_name(),
                "permissions": serde_json::to_value(permissions_for(role))?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Array(roles))
}

pub fn run(format: Format) -> Result<()> {
    match format {
        Format::Table => {
            let columns: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
            println!("{}", flag_table("capability", &columns, &rows()));
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&as_json()?)?);
        }
    }
    Ok(())
}
