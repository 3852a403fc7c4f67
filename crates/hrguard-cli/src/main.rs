//! hrguard CLI.
//!
//! Inspects the role permission matrix and evaluates authorization decisions
//! against the configured department directory.
//!
//! # Quick Start
//!
//! ```bash
//! # Show what every role may do
//! hrguard matrix
//!
//! # May principal 50, claiming department_manager, view employees?
//! hrguard check 50 department_manager canViewEmployees
//!
//! # Show the effective configuration
//! hrguard config --format toml
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hrguard_config::{ConfigLoader, HrguardConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// hrguard - role-based access control for HR records.
#[derive(Parser)]
#[command(name = "hrguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory containing hrguard.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Read this file instead of the layered configuration sources.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// List the role registry.
    Roles,

    /// Print the full role by capability matrix.
    Matrix {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Evaluate one authorization decision.
    Check {
        /// Principal id.
        principal: u64,

        /// Role claim as carried by the session (unknown values degrade).
        role: String,

        /// Capability name, e.g. canViewPayroll.
        capability: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Exit with an error when the decision denies access.
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective configuration.
    Config {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Text)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Text,
    Json,
    Toml,
}

fn load_config(cli: &Cli) -> Result<HrguardConfig> {
    match &cli.config {
        Some(path) => HrguardConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => ConfigLoader::new().with_project_dir(&cli.project).load(),
    }
}

fn init_logging(config: Option<&HrguardConfig>) {
    // RUST_LOG directives override the configured level
    let level = config
        .and_then(|config| config.logging.level.parse().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

/// Loads the configuration and installs logging at its level.
fn configure(cli: &Cli) -> Result<HrguardConfig> {
    let config = load_config(cli)?;
    init_logging(Some(&config));
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    // Only commands that read the directory or print settings touch the
    // configuration files.
    match &cli.command {
        Commands::Version => {
            init_logging(None);
            commands::version::run();
            Ok(())
        }
        Commands::Roles => {
            init_logging(None);
            commands::roles::run();
            Ok(())
        }
        Commands::Matrix { format } => {
            init_logging(None);
            commands::matrix::run(*format)
        }
        Commands::Check {
            principal,
            role,
            capability,
            format,
            strict,
        } => {
            let config = configure(&cli)?;
            commands::check::run(&config, *principal, role, capability, *format, *strict)
        }
        Commands::Config { format } => {
            let config = configure(&cli)?;
            commands::config::show(&config, *format)
        }
    }
}
