//! Configuration loader with multi-source merging

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::{HrguardConfig, Paths};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "HRG".to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "HRG")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/hrguard/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<HrguardConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = HrguardConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/hrguard/config.toml)
        if self.include_user_config
            && let Ok(user_config_file) = Paths::new().user_config_file()
            && user_config_file.exists()
        {
            builder = builder.add_source(
                config::File::from(user_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 3. Project config (hrguard.toml)
        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 4. Local config (hrguard.local.toml, gitignored)
        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (HRG_CACHE__TTL_SECS=30)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let hrguard_config: HrguardConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        hrguard_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(hrguard_config)
    }

    /// Load configuration, falling back to defaults on any error.
    ///
    /// The error is logged; a broken file never goes unnoticed.
    pub fn load_or_default(self) -> HrguardConfig {
        self.load().unwrap_or_else(|err| {
            let error = format!("{err:#}");
            warn!(error = %error, "Falling back to default configuration");
            HrguardConfig::default()
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepartmentAssignment;
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Collects formatted log lines for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("HRG_LOADER_TEST")
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path())
            .load()
            .expect("Failed to load config");

        assert_eq!(config, HrguardConfig::default());
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[directory]
lookup_timeout_ms = 500

[[directory.departments]]
manager_id = 50
department_id = 1302

[[directory.departments]]
manager_id = 51
department_id = 1400

[cache]
enabled = false

[logging]
level = "debug"
"#;
        fs::write(project_dir.join("hrguard.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.directory.lookup_timeout_ms, 500);
        assert_eq!(
            config.directory.departments,
            vec![
                DepartmentAssignment {
                    manager_id: 50,
                    department_id: 1302
                },
                DepartmentAssignment {
                    manager_id: 51,
                    department_id: 1400
                },
            ]
        );
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.audit);
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("hrguard.toml"),
            r"
[cache]
ttl_secs = 30
",
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("hrguard.local.toml"),
            r"
[cache]
ttl_secs = 5
",
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.cache.ttl_secs, 5);
    }

    #[test]
    fn test_invalid_project_config_is_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("hrguard.toml"),
            r"
[[directory.departments]]
manager_id = 50
department_id = 1302

[[directory.departments]]
manager_id = 50
department_id = 1400
",
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
        assert_eq!(
            loader(project_dir).load_or_default(),
            HrguardConfig::default()
        );
    }

    #[test]
    fn test_load_or_default_logs_the_failure() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        fs::write(
            project_dir.join("hrguard.toml"),
            "[directory]\nlookup_timeout_ms = 0\n",
        )
        .expect("Failed to write config");

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let load = || loader(project_dir).load_or_default();
        let config = tracing::subscriber::with_default(subscriber, load);

        assert_eq!(config, HrguardConfig::default());
        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Falling back to default configuration"));
        assert!(output.contains("must be greater than zero"));
    }
}
