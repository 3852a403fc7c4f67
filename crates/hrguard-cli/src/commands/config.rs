//! Configuration display.

use anyhow::Result;
use hrguard_config::HrguardConfig;

use crate::ConfigFormat;
use crate::style::SemanticStyle;

/// Show the effective configuration.
pub fn show(config: &HrguardConfig, format: ConfigFormat) -> Result<()> {
    match format {
        ConfigFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigFormat::Toml => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigFormat::Text => {
            println!("{}", "hrguard Configuration".header());
            println!();

            println!("Directory:");
            println!("  Lookup timeout: {}ms", config.directory.lookup_timeout_ms);
            println!(
                "  Managed departments: {}",
                config.directory.departments.len()
            );
            for assignment in &config.directory.departments {
                println!(
                    "    manager {} -> department {}",
                    assignment.manager_id, assignment.department_id
                );
            }
            println!();

            println!("Cache:");
            println!("  Enabled: {}", config.cache.enabled);
            println!("  TTL: {}s", config.cache.ttl_secs);
            println!("  Max entries: {}", config.cache.max_entries);
            println!();

            println!("Logging:");
            println!("  Level: {}", config.logging.level);
            println!("  Audit: {}", config.logging.audit);
        }
    }
    Ok(())
}
