//! Single-decision evaluation against the configured directory.

use anyhow::Result;
use hrguard_config::HrguardConfig;
use hrguard_directory::BoundedDirectory;
use hrguard_rbac::{AuthorizationDecision, Authorizer, Capability, Principal};
use hrguard_types::PrincipalId;
use serde_json::json;

use crate::Format;
use crate::style::{SemanticStyle, info_table};

pub fn run(
    config: &HrguardConfig,
    principal: u64,
    role_claim: &str,
    capability: &str,
    format: Format,
    strict: bool,
) -> Result<()> {
    let capability: Capability = capability.parse()?;

    let directory = BoundedDirectory::new(config.build_directory(), config.lookup_timeout());
    let mut authorizer = Authorizer::with_bounded(directory);
    if let Some(cache) = config.build_cache() {
        authorizer = authorizer.with_cache(cache);
    }
    if !config.logging.audit {
        authorizer = authorizer.without_audit();
    }

    let (principal, degraded) = Principal::from_claims(PrincipalId::new(principal), role_claim);
    let decision = authorizer.authorize(&principal, capability);
    let granted: Vec<Capability> = authorizer.permissions(&principal).granted().collect();

    match format {
        Format::Table => {
            if let Some(warning) = &degraded {
                println!("{} {warning}", "⚠".warning());
            }
            println!("{}", info_table(&entries(&decision, role_claim, &granted)));
        }
        Format::Json => {
            let value = json!({
                "principal": principal.id,
                "claim": role_claim,
                "role": principal.role,
                "degraded": degraded.is_some(),
                "capability": capability,
                "allowed": decision.allowed(),
                "scope": decision.scope(),
                "granted": granted,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if strict {
        decision.require()?;
    }
    Ok(())
}

fn entries(
    decision: &AuthorizationDecision,
    role_claim: &str,
    granted: &[Capability],
) -> Vec<(&'static str, String)> {
    let outcome = if decision.allowed() {
        "granted".success()
    } else {
        "denied".error()
    };
    let scope = decision
        .scope()
        .map_or_else(|| "-".muted(), ToString::to_string);

    vec![
        ("Principal", decision.principal().to_string()),
        ("Claim", role_claim.to_string()),
        ("Role", decision.role().display_name().to_string()),
        ("Requirement", decision.requirement().to_string()),
        ("Decision", outcome),
        ("Scope", scope),
        (
            "Capabilities",
            format!("{} of {}", granted.len(), Capability::ALL.len()),
        ),
    ]
}
