//! Configuration management for hrguard
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (`HRG_*` prefix, `__` between nested keys)
//! 2. hrguard.local.toml (gitignored, local overrides)
//! 3. hrguard.toml (git-tracked, project config)
//! 4. ~/.config/hrguard/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! ```toml
//! [directory]
//! lookup_timeout_ms = 250
//!
//! [[directory.departments]]
//! manager_id = 50
//! department_id = 1302
//!
//! [cache]
//! enabled = true
//! ttl_secs = 60
//!
//! [logging]
//! level = "info"
//! audit = true
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use hrguard_directory::{DEFAULT_LOOKUP_TIMEOUT, Directory};
use hrguard_rbac::DecisionCache;
use hrguard_rbac::cache::{DEFAULT_CACHE_TTL, DEFAULT_MAX_ENTRIES};
use hrguard_types::{DepartmentId, PrincipalId};
use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main hrguard configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrguardConfig {
    pub directory: DirectoryConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Deadline for a single manager-to-department lookup.
    pub lookup_timeout_ms: u64,
    pub departments: Vec<DepartmentAssignment>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: u64::try_from(DEFAULT_LOOKUP_TIMEOUT.as_millis()).unwrap_or(250),
            departments: Vec::new(),
        }
    }
}

/// One manager-to-department entry seeding the in-memory directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAssignment {
    pub manager_id: u64,
    pub department_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level; `RUST_LOG` directives take precedence.
    pub level: String,
    /// Emit one event per grant or denial.
    pub audit: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            audit: true,
        }
    }
}

impl HrguardConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Reads a single TOML file, bypassing the layered sources.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would weaken fail-closed behavior or make the
    /// directory ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.lookup_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "directory.lookup_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be greater than zero when the cache is enabled"
                    .to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for assignment in &self.directory.departments {
            if !seen.insert(assignment.manager_id) {
                return Err(ConfigError::DuplicateManager(PrincipalId::new(
                    assignment.manager_id,
                )));
            }
        }

        Ok(())
    }

    /// Builds the in-memory directory from `[[directory.departments]]`.
    pub fn build_directory(&self) -> Directory {
        Directory::from_assignments(self.directory.departments.iter().map(|a| {
            (
                PrincipalId::new(a.manager_id),
                DepartmentId::new(a.department_id),
            )
        }))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.directory.lookup_timeout_ms)
    }

    /// Builds the decision cache, or `None` if caching is disabled.
    pub fn build_cache(&self) -> Option<DecisionCache> {
        self.cache.enabled.then(|| {
            DecisionCache::with_limits(
                Duration::from_secs(self.cache.ttl_secs),
                self.cache.max_entries,
            )
        })
    }
}
